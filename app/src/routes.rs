use reqbind::{Bind, BindConfig, Router, Source, Validator};

use crate::controllers;
use crate::requests::{CreatePerson, NewAlbum, Pagination, PersonPath};

pub fn register() -> Router {
    let validator = Validator::new()
        .message("length", "has the wrong length")
        .message("email", "is not an email address");

    Router::new()
        .get("/people", controllers::people::index)
        .middleware(Bind::<Pagination>::new(
            BindConfig::new()
                .source(Source::Query)
                .next(|req| req.query().is_none()),
        ))
        .get("/people/{id}", controllers::people::show)
        .middleware(Bind::<PersonPath>::new(BindConfig::new().source(Source::Params)))
        .post("/people", controllers::people::store)
        .middleware(Bind::<CreatePerson>::new(
            BindConfig::new()
                .source(Source::Json)
                .validator(validator.clone()),
        ))
        .post("/albums", controllers::albums::store)
        .middleware(Bind::<NewAlbum>::new(
            BindConfig::new()
                .source(Source::Form)
                .validator(validator)
                .form_file("cover", "cover")
                .form_file("photos", "photos"),
        ))
        .into()
}
