use crate::requests::NewAlbum;
use reqbind::{json, Request, Response, Source};
use serde_json::json as body;

pub async fn store(req: Request) -> Response {
    let album = req.bound::<NewAlbum>(Source::Form)?;
    json(body!({
        "title": album.title,
        "cover": album.cover,
        "photos": album.photos,
    }))
}
