use scholia_types::{
    CategoryRequest, CategoryResult, DescriptionRequest, DescriptionResult, Flashcard,
    FlashcardMetadata, FlashcardRequest, FlashcardSet, VideoRequest,
};
use utoipa::OpenApi;

use crate::routes::{analysis, categories, flashcards, health};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        categories::identify_categories,
        analysis::analyze_static_data,
        analysis::analyze_video,
        flashcards::generate_flashcards,
        flashcards::political_philosophy_flashcards,
        flashcards::kant_flashcards,
    ),
    components(schemas(
        health::HealthResponse,
        CategoryRequest,
        CategoryResult,
        DescriptionRequest,
        DescriptionResult,
        VideoRequest,
        FlashcardRequest,
        Flashcard,
        FlashcardSet,
        FlashcardMetadata,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "categories", description = "Content classification"),
        (name = "analysis", description = "Descriptions of text and video"),
        (name = "flashcards", description = "Study flashcard generation")
    ),
    info(title = "Scholia API", description = "Gemini-backed categories, descriptions and flashcards")
)]
pub struct ApiDoc;
