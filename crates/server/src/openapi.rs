use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct SubscriptionInputDoc {
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    /// Monthly price in whole currency units, > 0.
    #[schema(example = 400)]
    pub price: i64,
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: String,
    #[schema(example = "07-2025")]
    pub start_date: String,
    /// Empty for an open-ended subscription.
    #[schema(example = "")]
    pub end_date: String,
}

#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: String,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    /// RFC 3339, first instant of the start month (UTC).
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct TotalCostDoc { pub total_cost: i64 }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub message: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::subscriptions::create,
        crate::subscriptions::get_by_id,
        crate::subscriptions::list_all,
        crate::subscriptions::update,
        crate::subscriptions::delete,
        crate::subscriptions::total_cost,
    ),
    components(
        schemas(
            HealthResponse,
            SubscriptionInputDoc,
            SubscriptionDoc,
            TotalCostDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
