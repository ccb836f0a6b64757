use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::models::{HealthResponse, SearchResponse};
use crate::restaurant::Restaurant;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Restaurant Search API",
        description = "Filtered, sorted and paginated search over the restaurant catalog"
    ),
    paths(crate::routes::search, crate::routes::health),
    components(schemas(SearchResponse, Restaurant, ErrorResponse, HealthResponse)),
    tags(
        (name = "search", description = "Restaurant search"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
