//! Request schemas

use reqbind::{schema, UploadedFile};
use serde::Serialize;

#[schema]
#[derive(Debug, Serialize)]
pub struct CreatePerson {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = 18))]
    pub age: i32,

    #[validate(email)]
    pub email: Option<String>,
}

#[schema]
#[derive(Debug, Serialize)]
pub struct Pagination {
    #[validate(range(min = 1))]
    pub page: u32,

    #[bind(query = "per_page")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}

#[schema]
#[derive(Debug)]
pub struct PersonPath {
    #[validate(range(min = 1))]
    pub id: u64,
}

#[schema]
#[derive(Debug)]
pub struct NewAlbum {
    #[bind(form = "album_title")]
    #[validate(length(min = 1, max = 120))]
    pub title: String,

    pub cover: Option<UploadedFile>,

    #[validate(length(max = 20))]
    pub photos: Vec<UploadedFile>,
}
