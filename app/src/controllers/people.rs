use crate::requests::{CreatePerson, Pagination, PersonPath};
use reqbind::{json, Request, Response, Source};
use serde_json::json as body;

pub async fn index(req: Request) -> Response {
    // Requests without a query string skip binding and get the first page
    let (page, limit) = req
        .local::<Pagination>(Source::Query.as_str())
        .map_or((1, 20), |p| (p.page, p.limit));
    json(body!({
        "page": page,
        "limit": limit,
        "people": [],
    }))
}

pub async fn show(req: Request) -> Response {
    let path = req.bound::<PersonPath>(Source::Params)?;
    json(body!({
        "id": path.id,
        "name": format!("Person {}", path.id),
    }))
}

pub async fn store(req: Request) -> Response {
    let person = req.bound::<CreatePerson>(Source::Json)?;
    tracing::info!(name = %person.name, "person created");
    json(body!({ "created": person }))
}
