use pretty_assertions::assert_eq;
use reqbind::testing::{MultipartBody, TestClient};
use reqbind::{
    expect, json, schema, text, Bind, BindConfig, Request, Response, Router, Source,
    UploadedFile,
};
use serde_json::json as value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[schema]
#[derive(Debug, serde::Serialize)]
struct Person {
    #[validate(length(min = 1))]
    name: String,
    #[validate(range(min = 18))]
    age: i32,
}

#[schema]
#[derive(Debug, serde::Serialize)]
struct Page {
    #[validate(range(min = 1))]
    page: u32,
    #[validate(range(min = 1, max = 100))]
    limit: u32,
}

#[schema]
#[derive(Debug)]
struct UserPath {
    #[validate(range(min = 1))]
    id: u64,
}

#[schema]
#[derive(Debug)]
struct Search {
    #[bind(query = "q", form = "search_term")]
    #[serde(rename = "searchTerm")]
    #[validate(length(min = 1))]
    term: String,
}

#[schema]
#[derive(Debug)]
struct Album {
    #[bind(form = "album_title")]
    #[validate(length(min = 1))]
    title: String,
    cover: Option<UploadedFile>,
    photos: Vec<UploadedFile>,
}

#[schema]
#[derive(Debug, serde::Serialize)]
struct Tagged {
    #[validate(length(min = 1, max = 3))]
    tags: Vec<String>,
    ids: Vec<u32>,
}

async fn echo_person(req: Request) -> Response {
    let person = req.bound::<Person>(Source::Json)?;
    json(serde_json::to_value(person).unwrap_or_default())
}

async fn echo_page(req: Request) -> Response {
    let page = req.bound::<Page>(Source::Query)?;
    json(serde_json::to_value(page).unwrap_or_default())
}

async fn show_user(req: Request) -> Response {
    let user = req.bound::<UserPath>(Source::Params)?;
    text(user.id.to_string())
}

async fn show_album(req: Request) -> Response {
    let album = req.bound::<Album>(Source::Form)?;
    json(value!({
        "title": album.title,
        "cover": album.cover.as_ref().map(|f| f.file_name.clone()),
        "photos": album.photos.iter().map(|f| f.file_name.clone()).collect::<Vec<_>>(),
    }))
}

/// Router whose handler counts how often it runs
fn counted<T: reqbind::Schema>(config: BindConfig) -> (TestClient, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new()
        .post("/", move |_req: Request| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                text("handled")
            }
        })
        .middleware(Bind::<T>::new(config));
    (TestClient::new(router), hits)
}

#[tokio::test]
async fn json_body_binds_and_echoes() {
    let client = TestClient::new(
        Router::new()
            .post("/people", echo_person)
            .middleware(Bind::<Person>::new(BindConfig::new().source(Source::Json))),
    );

    let response = client
        .post("/people")
        .json(&value!({ "name": "John", "age": 20 }))
        .send()
        .await;

    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({ "name": "John", "age": 20 }));
}

#[tokio::test]
async fn invalid_json_body_stops_the_chain() {
    let (client, hits) = counted::<Person>(BindConfig::new().source(Source::Json));

    let response = client
        .post("/")
        .json(&value!({ "name": "", "age": 20 }))
        .send()
        .await;

    expect!(&response).to_have_status(422);
    expect!(&response).to_have_json(value!({ "name": "length" }));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn query_within_range_binds() {
    let client = TestClient::new(
        Router::new()
            .get("/items", echo_page)
            .middleware(Bind::<Page>::new(BindConfig::new().source(Source::Query))),
    );

    let response = client.get("/items?page=2&limit=50").send().await;

    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({ "page": 2, "limit": 50 }));
}

#[tokio::test]
async fn query_out_of_range_is_rejected() {
    let client = TestClient::new(
        Router::new()
            .get("/items", echo_page)
            .middleware(Bind::<Page>::new(BindConfig::new().source(Source::Query))),
    );

    let response = client.get("/items?page=0&limit=150").send().await;

    expect!(&response).to_have_status(422);
    expect!(&response).to_have_json(value!({ "page": "range", "limit": "range" }));
}

#[tokio::test]
async fn route_params_bind() {
    let client = TestClient::new(
        Router::new()
            .get("/users/{id}", show_user)
            .middleware(Bind::<UserPath>::new(BindConfig::new().source(Source::Params))),
    );

    let rejected = client.get("/users/0").send().await;
    expect!(&rejected).to_have_status(422);
    expect!(&rejected).to_have_json(value!({ "id": "range" }));

    let accepted = client.get("/users/123").send().await;
    expect!(&accepted).to_have_status(200);
    assert_eq!(accepted.body(), "123");
}

#[tokio::test]
async fn non_numeric_param_is_a_parse_error() {
    let (client, hits) = counted::<UserPath>(BindConfig::new().source(Source::Params));
    let router_client = TestClient::new(
        Router::new()
            .get("/users/{id}", show_user)
            .middleware(Bind::<UserPath>::new(BindConfig::new().source(Source::Params))),
    );

    let response = router_client.get("/users/abc").send().await;
    expect!(&response).to_have_status(422);
    expect!(&response).to_have_body_containing("error");

    // No params matched at all: id falls back to its default and fails validation
    let response = client.post("/").send().await;
    expect!(&response).to_have_status(422);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn urlencoded_form_uses_form_names() {
    let client = TestClient::new(
        Router::new()
            .post("/search", |req: Request| async move {
                let search = req.bound::<Search>(Source::Form)?;
                text(search.term.clone())
            })
            .middleware(Bind::<Search>::new(BindConfig::new().source(Source::Form))),
    );

    let response = client
        .post("/search")
        .form(&[("search_term", "rust")])
        .send()
        .await;
    expect!(&response).to_have_status(200);
    assert_eq!(response.body(), "rust");

    let response = client.post("/search").form(&[("search_term", "")]).send().await;
    expect!(&response).to_have_status(422);
    expect!(&response).to_have_json(value!({ "search_term": "length" }));
}

#[tokio::test]
async fn error_names_follow_the_source() {
    let query_client = TestClient::new(
        Router::new()
            .get("/", |_req: Request| async { text("ok") })
            .middleware(Bind::<Search>::new(BindConfig::new().source(Source::Query))),
    );
    let response = query_client.get("/?q=").send().await;
    expect!(&response).to_have_json(value!({ "q": "length" }));

    let (json_client, _) = counted::<Search>(BindConfig::new().source(Source::Json));
    let response = json_client
        .post("/")
        .json(&value!({ "searchTerm": "" }))
        .send()
        .await;
    expect!(&response).to_have_json(value!({ "searchTerm": "length" }));
}

fn tagged_client(source: Source) -> TestClient {
    let echo = move |req: Request| async move {
        let tagged = req.bound::<Tagged>(source)?;
        json(serde_json::to_value(tagged).unwrap_or_default())
    };
    let binder = Bind::<Tagged>::new(BindConfig::new().source(source));
    TestClient::new(
        Router::new()
            .get("/tags", echo)
            .middleware(binder.clone())
            .post("/tags", echo)
            .middleware(binder),
    )
}

#[tokio::test]
async fn repeated_query_keys_bind_sequences() {
    let client = tagged_client(Source::Query);

    let response = client.get("/tags?tags=a&ids=4&tags=b&ids=5").send().await;
    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({ "tags": ["a", "b"], "ids": [4, 5] }));

    let response = client.get("/tags?tags=a").send().await;
    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({ "tags": ["a"], "ids": [] }));

    let response = client.get("/tags?tags=a&tags=b&tags=c&tags=d").send().await;
    expect!(&response).to_have_status(422);
    expect!(&response).to_have_json(value!({ "tags": "length" }));
}

#[tokio::test]
async fn repeated_form_fields_bind_sequences() {
    let client = tagged_client(Source::Form);

    let response = client
        .post("/tags")
        .form(&[("tags", "x"), ("tags", "y"), ("ids", "1")])
        .send()
        .await;
    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({ "tags": ["x", "y"], "ids": [1] }));

    let body = MultipartBody::new()
        .text("tags", "red")
        .text("tags", "blue")
        .text("ids", "9");
    let response = client.post("/tags").multipart(body).send().await;
    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({ "tags": ["red", "blue"], "ids": [9] }));
}

#[tokio::test]
async fn empty_query_value_falls_back_to_default() {
    let client = TestClient::new(
        Router::new()
            .get("/items", echo_page)
            .middleware(Bind::<Page>::new(BindConfig::new().source(Source::Query))),
    );

    // limit= decodes as 0, which the range rule then rejects
    let response = client.get("/items?page=2&limit=").send().await;
    expect!(&response).to_have_status(422);
    expect!(&response).to_have_json(value!({ "limit": "range" }));

    let response = tagged_client(Source::Query).get("/tags?tags=").send().await;
    expect!(&response).to_have_status(422);
    expect!(&response).to_have_json(value!({ "tags": "length" }));
}

fn album_client(config: BindConfig) -> TestClient {
    TestClient::new(
        Router::new()
            .post("/albums", show_album)
            .middleware(Bind::<Album>::new(config.source(Source::Form))),
    )
}

#[tokio::test]
async fn uploaded_files_overlay_single_and_sequence_fields() {
    let client = album_client(
        BindConfig::new()
            .form_file("cover", "file")
            .form_file("photos", "photos"),
    );

    let body = MultipartBody::new()
        .text("album_title", "Summer")
        .file("file", "cover.png", "image/png", b"cover".to_vec())
        .file("photos", "one.jpg", "image/jpeg", b"1".to_vec())
        .file("photos", "two.jpg", "image/jpeg", b"22".to_vec())
        .file("photos", "three.jpg", "image/jpeg", b"333".to_vec());

    let response = client.post("/albums").multipart(body).send().await;

    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({
        "title": "Summer",
        "cover": "cover.png",
        "photos": ["one.jpg", "two.jpg", "three.jpg"],
    }));
}

#[tokio::test]
async fn body_source_overlays_uploaded_files() {
    let client = TestClient::new(
        Router::new()
            .post("/albums", |req: Request| async move {
                let album = req.bound::<Album>(Source::Body)?;
                let cover = album.cover.as_ref().map(|f| (f.file_name.clone(), f.data.len()));
                json(value!({ "title": album.title, "cover": cover }))
            })
            .middleware(Bind::<Album>::new(BindConfig::new().form_file("cover", "file"))),
    );

    let body = MultipartBody::new()
        .text("album_title", "Autumn")
        .file("file", "leaves.png", "image/png", b"leaves".to_vec());
    let response = client.post("/albums").multipart(body).send().await;

    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({ "title": "Autumn", "cover": ["leaves.png", 6] }));
}

#[tokio::test]
async fn single_field_takes_first_of_many_uploads() {
    let client = album_client(BindConfig::new().form_file("cover", "file"));

    let body = MultipartBody::new()
        .text("album_title", "Winter")
        .file("file", "first.png", "image/png", b"a".to_vec())
        .file("file", "second.png", "image/png", b"b".to_vec());

    let response = client.post("/albums").multipart(body).send().await;

    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({
        "title": "Winter",
        "cover": "first.png",
        "photos": [],
    }));
}

#[tokio::test]
async fn missing_uploads_leave_fields_empty() {
    let client = album_client(BindConfig::new().form_file("cover", "file"));

    let body = MultipartBody::new().text("album_title", "Empty");
    let response = client.post("/albums").multipart(body).send().await;

    expect!(&response).to_have_status(200);
    expect!(&response).to_have_json(value!({ "title": "Empty", "cover": null, "photos": [] }));
}

#[tokio::test]
async fn files_mapped_onto_plain_field_are_unsupported() {
    let client = album_client(BindConfig::new().form_file("title", "file"));

    let body = MultipartBody::new()
        .text("album_title", "Oops")
        .file("file", "a.png", "image/png", b"a".to_vec());
    let response = client.post("/albums").multipart(body).send().await;

    expect!(&response).to_have_status(415);
    expect!(&response)
        .to_have_json(value!({ "error": "Unsupported field type for title: String" }));
}

#[tokio::test]
async fn skip_predicate_bypasses_binding() {
    let router = Router::new()
        .post("/", |req: Request| async move {
            text(req.has_local("json").to_string())
        })
        .middleware(Bind::<Person>::new(
            BindConfig::new()
                .source(Source::Json)
                .next(|req| req.header("x-skip-bind").is_some()),
        ));
    let client = TestClient::new(router);

    let skipped = client
        .post("/")
        .header("x-skip-bind", "1")
        .body("not json at all", "text/plain")
        .send()
        .await;
    expect!(&skipped).to_have_status(200);
    assert_eq!(skipped.body(), "false");

    let bound = client
        .post("/")
        .json(&value!({ "name": "Ann", "age": 30 }))
        .send()
        .await;
    expect!(&bound).to_have_status(200);
    assert_eq!(bound.body(), "true");
}

#[tokio::test]
async fn query_binder_ignores_the_body() {
    let (client, hits) = counted::<Page>(BindConfig::new().source(Source::Query));

    let response = client
        .post("/")
        .json(&value!({ "page": 2, "limit": 50 }))
        .send()
        .await;

    expect!(&response).to_have_status(422);
    expect!(&response).to_have_json(value!({ "page": "range", "limit": "range" }));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let response = client.post("/?page=2&limit=50").send().await;
    expect!(&response).to_have_status(200);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_requests_get_the_same_answer() {
    let (client, hits) = counted::<Person>(BindConfig::new().source(Source::Json));

    for _ in 0..3 {
        let ok = client
            .post("/")
            .json(&value!({ "name": "John", "age": 20 }))
            .send()
            .await;
        expect!(&ok).to_have_status(200);

        let bad = client
            .post("/")
            .json(&value!({ "name": "John", "age": 12 }))
            .send()
            .await;
        expect!(&bad).to_have_status(422);
        expect!(&bad).to_have_json(value!({ "age": "range" }));
    }

    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unrecognized_source_is_a_server_error() {
    let (client, hits) = counted::<Person>(BindConfig::new().source_named("cookies"));

    let response = client
        .post("/")
        .json(&value!({ "name": "John", "age": 20 }))
        .send()
        .await;

    expect!(&response).to_have_status(500);
    expect!(&response).to_have_json(value!({ "error": "Unrecognized data source: cookies" }));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_payloads_are_unprocessable() {
    let (client, _) = counted::<Person>(BindConfig::new());

    let truncated = client
        .post("/")
        .body(r#"{"name": "John""#, "application/json")
        .send()
        .await;
    expect!(&truncated).to_have_status(422);
    expect!(&truncated).to_have_body_containing("EOF");

    let wrong_type = client
        .post("/")
        .json(&value!({ "name": "John", "age": "twenty" }))
        .send()
        .await;
    expect!(&wrong_type).to_have_status(422);

    let unsupported = client.post("/").body("hello", "text/plain").send().await;
    expect!(&unsupported).to_have_status(422);
    expect!(&unsupported).to_have_json(value!({ "error": "Unsupported Content-Type: text/plain" }));
}

#[tokio::test]
async fn body_source_decodes_xml() {
    let (client, hits) = counted::<Person>(BindConfig::new());

    let response = client
        .post("/")
        .body("<person><name>John</name><age>20</age></person>", "application/xml")
        .send()
        .await;

    expect!(&response).to_have_status(200);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn binders_for_different_sources_share_a_route() {
    let router = Router::new()
        .get("/users/{id}/items", |req: Request| async move {
            let user = req.bound::<UserPath>(Source::Params)?;
            let page = req.bound::<Page>(Source::Query)?;
            text(format!("{}:{}:{}", user.id, page.page, page.limit))
        })
        .middleware(Bind::<UserPath>::new(BindConfig::new().source(Source::Params)))
        .middleware(Bind::<Page>::new(BindConfig::new().source(Source::Query)));
    let client = TestClient::new(router);

    let response = client.get("/users/7/items?page=3&limit=10").send().await;

    expect!(&response).to_have_status(200);
    assert_eq!(response.body(), "7:3:10");
}
