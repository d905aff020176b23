//! Scenario tests for the posts crate over the in-memory repositories

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use auth::models::{user_id::UserId, user_name::UserName};

    use crate::application::CreatePostInput;
    use crate::infra::InMemoryPostRepository;

    pub fn repo() -> Arc<InMemoryPostRepository> {
        Arc::new(InMemoryPostRepository::new())
    }

    pub fn body() -> String {
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod.".to_string()
    }

    pub fn author(name: &str) -> (UserId, UserName) {
        (UserId::new(), UserName::new(name).unwrap())
    }

    pub fn input(by: &(UserId, UserName), title: &str) -> CreatePostInput {
        CreatePostInput {
            author: by.0,
            username: by.1.clone(),
            title: title.to_string(),
            image_url: None,
            content: body(),
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use auth::AuthoredContent;
    use auth::models::user_name::UserName;
    use tokio::sync::Barrier;

    use super::support::*;
    use crate::application::*;
    use crate::domain::entity::post::Post;
    use crate::domain::repository::{
        PostFilter, PostQuery, PostRepository, PostStats, SortField, SortOrder,
    };
    use crate::domain::value_object::{post_id::PostId, slug::Slug};
    use crate::error::{PostError, PostResult};
    use crate::infra::InMemoryPostRepository;

    #[tokio::test]
    async fn test_colliding_titles_get_numbered_slugs() {
        let repo = repo();
        let alice = author("alice");
        let create = CreatePostUseCase::new(repo.clone());

        let mut slugs = Vec::new();
        for title in ["Hello, World!", "hello world", "HELLO --- world"] {
            slugs.push(create.execute(input(&alice, title)).await.unwrap().slug.to_string());
        }
        assert_eq!(slugs, vec!["hello-world", "hello-world-1", "hello-world-2"]);
    }

    #[tokio::test]
    async fn test_accented_titles_fold_into_readable_slugs() {
        let repo = repo();
        let alice = author("alice");
        let create = CreatePostUseCase::new(repo.clone());

        let mut slugs = Vec::new();
        for title in ["Café & Crème", "Cafe and Creme!", "What's on the menu?"] {
            slugs.push(create.execute(input(&alice, title)).await.unwrap().slug.to_string());
        }
        assert_eq!(slugs, vec!["cafe-and-creme", "cafe-and-creme-1", "whats-on-the-menu"]);
    }

    #[tokio::test]
    async fn test_create_reports_every_invalid_field() {
        let alice = author("alice");
        let err = CreatePostUseCase::new(repo())
            .execute(CreatePostInput {
                title: "abc".into(),
                image_url: Some("not a url".into()),
                content: "short".into(),
                ..input(&alice, "")
            })
            .await
            .unwrap_err();

        let PostError::ValidationFailed(details) = err else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_ref()).collect();
        assert_eq!(fields, vec!["content", "imageURL", "title"]);
    }

    #[tokio::test]
    async fn test_retitle_changes_slug_only_when_title_changes() {
        let repo = repo();
        let alice = author("alice");
        let post = CreatePostUseCase::new(repo.clone())
            .execute(input(&alice, "First Title"))
            .await
            .unwrap();
        let update = UpdatePostUseCase::new(repo.clone());

        let same = update
            .execute(UpdatePostInput {
                id: post.id.to_string(),
                requester: alice.0,
                title: Some("First Title".into()),
                image_url: None,
                content: None,
            })
            .await
            .unwrap();
        assert_eq!(same.slug.as_str(), "first-title");

        let renamed = update
            .execute(UpdatePostInput {
                id: post.id.to_string(),
                requester: alice.0,
                title: Some("Second Title".into()),
                image_url: Some("https://example.com/cover.png".into()),
                content: None,
            })
            .await
            .unwrap();
        assert_eq!(renamed.slug.as_str(), "second-title");
        assert_eq!(
            renamed.image_url.as_ref().map(|u| u.as_str()),
            Some("https://example.com/cover.png")
        );

        // Blank clears the image
        let cleared = update
            .execute(UpdatePostInput {
                id: post.id.to_string(),
                requester: alice.0,
                title: None,
                image_url: Some(String::new()),
                content: None,
            })
            .await
            .unwrap();
        assert!(cleared.image_url.is_none());
        assert!(repo.find_by_slug("first-title").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_author_is_forbidden() {
        let repo = repo();
        let (alice, mallory) = (author("alice"), author("mallory"));
        let post = CreatePostUseCase::new(repo.clone())
            .execute(input(&alice, "Alice Writes"))
            .await
            .unwrap();

        let err = UpdatePostUseCase::new(repo.clone())
            .execute(UpdatePostInput {
                id: post.id.to_string(),
                requester: mallory.0,
                title: Some("Hijacked Title".into()),
                image_url: None,
                content: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You are not authorized to update this post");

        let err = DeletePostUseCase::new(repo.clone())
            .execute(DeletePostInput {
                id: post.id.to_string(),
                requester: mallory.0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You are not authorized to delete this post");
        assert!(repo.find_by_id(&post.id).await.unwrap().is_some());

        let deleted = DeletePostUseCase::new(repo.clone())
            .execute(DeletePostInput {
                id: post.id.to_string(),
                requester: alice.0,
            })
            .await
            .unwrap();
        assert_eq!(deleted, post.id);
        assert!(repo.find_by_id(&post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_and_missing_ids() {
        let repo = repo();
        let alice = author("alice");

        let err = DeletePostUseCase::new(repo.clone())
            .execute(DeletePostInput {
                id: "x".into(),
                requester: alice.0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid id: x");
        assert_eq!(err.status_code(), 400);

        let err = DeletePostUseCase::new(repo.clone())
            .execute(DeletePostInput {
                id: PostId::new().to_string(),
                requester: alice.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::NotFound));
    }

    #[tokio::test]
    async fn test_get_by_slug_or_id() {
        let repo = repo();
        let post = CreatePostUseCase::new(repo.clone())
            .execute(input(&author("alice"), "Findable Post"))
            .await
            .unwrap();
        let get = GetPostUseCase::new(repo.clone());

        assert_eq!(get.execute("findable-post").await.unwrap().id, post.id);
        assert_eq!(get.execute(&post.id.to_string()).await.unwrap().id, post.id);
        assert!(matches!(get.execute("nope").await, Err(PostError::NotFound)));
    }

    #[tokio::test]
    async fn test_pagination_over_25_posts() {
        let repo = repo();
        let alice = author("alice");
        let create = CreatePostUseCase::new(repo.clone());
        for i in 0..25 {
            create.execute(input(&alice, &format!("Post number {i}"))).await.unwrap();
        }

        let list = ListPostsUseCase::new(repo.clone());
        let query = |page| PostQuery {
            page,
            ..PostQuery::new(PostFilter::Search(None))
        };

        let first = list.execute(query(1)).await.unwrap();
        assert_eq!(first.posts.len(), 10);
        assert_eq!(first.pagination.total_pages, 3);
        assert!(first.pagination.has_next_page);

        let last = list.execute(query(3)).await.unwrap();
        assert_eq!(last.posts.len(), 5);
        assert!(!last.pagination.has_next_page);
        assert!(last.pagination.has_prev_page);

        let beyond = list.execute(query(4)).await.unwrap();
        assert!(beyond.posts.is_empty());
        assert_eq!(beyond.pagination.total_posts, 25);
    }

    #[tokio::test]
    async fn test_search_and_sort() {
        let repo = repo();
        let (alice, bob) = (author("alice"), author("bob_writer"));
        let create = CreatePostUseCase::new(repo.clone());
        create.execute(input(&alice, "Learning Rust today")).await.unwrap();
        create.execute(input(&alice, "Gardening notes")).await.unwrap();
        create.execute(input(&bob, "Another rusty bike")).await.unwrap();

        let list = ListPostsUseCase::new(repo.clone());
        let found = list
            .execute(PostQuery {
                sort: SortField::Title,
                order: SortOrder::Asc,
                ..PostQuery::new(PostFilter::Search(Some("RUST".into())))
            })
            .await
            .unwrap();
        let titles: Vec<&str> = found.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Another rusty bike", "Learning Rust today"]);

        // Search also matches the author's username
        let by_name = list
            .execute(PostQuery::new(PostFilter::Search(Some("writer".into()))))
            .await
            .unwrap();
        assert_eq!(by_name.pagination.total_posts, 1);

        let mine = list
            .execute(PostQuery::new(PostFilter::Author(alice.0)))
            .await
            .unwrap();
        assert_eq!(mine.pagination.total_posts, 2);
    }

    #[tokio::test]
    async fn test_stats() {
        let repo = repo();
        let (alice, bob) = (author("alice"), author("bob"));
        let create = CreatePostUseCase::new(repo.clone());
        for i in 0..4 {
            create.execute(input(&alice, &format!("Alice post {i}"))).await.unwrap();
        }
        for i in 0..3 {
            create.execute(input(&bob, &format!("Bob post {i}"))).await.unwrap();
        }

        let stats = StatsUseCase::new(repo).execute().await.unwrap();
        assert_eq!(stats.total_posts, 7);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.recent_posts.len(), PostStats::RECENT);
    }

    #[tokio::test]
    async fn test_rename_author_touches_only_that_author() {
        let repo = repo();
        let (alice, bob) = (author("alice"), author("bob"));
        let create = CreatePostUseCase::new(repo.clone());
        create.execute(input(&alice, "Alice one")).await.unwrap();
        create.execute(input(&alice, "Alice two")).await.unwrap();
        create.execute(input(&bob, "Bob only")).await.unwrap();

        let renamed = repo
            .rename_author(&alice.0, &UserName::new("alicia").unwrap())
            .await
            .unwrap();
        assert_eq!(renamed, 2);

        let list = ListPostsUseCase::new(repo.clone());
        let by_new = list
            .execute(PostQuery::new(PostFilter::Username("alicia".into())))
            .await
            .unwrap();
        assert_eq!(by_new.pagination.total_posts, 2);
        let by_old = list
            .execute(PostQuery::new(PostFilter::Username("alice".into())))
            .await
            .unwrap();
        assert_eq!(by_old.pagination.total_posts, 0);
        let bobs = list
            .execute(PostQuery::new(PostFilter::Username("bob".into())))
            .await
            .unwrap();
        assert_eq!(bobs.pagination.total_posts, 1);
    }

    /// Holds the first two slug lookups until both have run, so two creates
    /// see the same free slug.
    struct RacingRepo {
        inner: InMemoryPostRepository,
        barrier: Barrier,
        slug_checks: AtomicUsize,
    }

    impl PostRepository for RacingRepo {
        async fn create(&self, post: &Post) -> PostResult<()> {
            self.inner.create(post).await
        }

        async fn find_by_id(&self, id: &PostId) -> PostResult<Option<Post>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_slug(&self, slug: &str) -> PostResult<Option<Post>> {
            self.inner.find_by_slug(slug).await
        }

        async fn slug_exists(&self, slug: &Slug, except: Option<&PostId>) -> PostResult<bool> {
            let exists = self.inner.slug_exists(slug, except).await?;
            if self.slug_checks.fetch_add(1, Ordering::SeqCst) < 2 {
                self.barrier.wait().await;
            }
            Ok(exists)
        }

        async fn update(&self, post: &Post) -> PostResult<()> {
            self.inner.update(post).await
        }

        async fn delete(&self, id: &PostId) -> PostResult<bool> {
            self.inner.delete(id).await
        }

        async fn list(&self, query: &PostQuery) -> PostResult<(Vec<Post>, u64)> {
            self.inner.list(query).await
        }

        async fn stats(&self) -> PostResult<PostStats> {
            self.inner.stats().await
        }
    }

    #[tokio::test]
    async fn test_concurrent_identical_titles_never_share_a_slug() {
        let repo = Arc::new(RacingRepo {
            inner: InMemoryPostRepository::new(),
            barrier: Barrier::new(2),
            slug_checks: AtomicUsize::new(0),
        });
        let alice = author("alice");
        let create = CreatePostUseCase::new(repo.clone());

        let (a, b) = tokio::join!(
            create.execute(input(&alice, "Race Condition")),
            create.execute(input(&alice, "Race Condition")),
        );

        let (won, lost): (Vec<_>, Vec<_>) = [a, b].into_iter().partition(|r| r.is_ok());
        assert_eq!(won.len(), 1);
        assert!(matches!(
            lost.into_iter().next(),
            Some(Err(PostError::DuplicateKey { ref field })) if field == "slug"
        ));
        assert_eq!(repo.inner.stats().await.unwrap().total_posts, 1);
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use auth::application::{RegisterInput, RegisterUseCase};
    use auth::middleware::AuthGate;
    use auth::{AuthConfig, InMemoryAuthRepository};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use platform::password::PasswordHasherConfig;
    use platform::rate_limit::{InMemoryRateLimitStore, RateLimitConfig, RateLimiter};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::body;
    use crate::presentation::posts_router;

    struct TestApp {
        router: Router,
        users: Arc<InMemoryAuthRepository>,
        config: Arc<AuthConfig>,
    }

    impl TestApp {
        fn new() -> Self {
            let users = Arc::new(InMemoryAuthRepository::new());
            let config =
                Arc::new(AuthConfig::development().with_hasher(PasswordHasherConfig::fast()));
            let gate = AuthGate::new(users.clone(), config.clone());
            let limiter = RateLimiter::new(InMemoryRateLimitStore::new(), RateLimitConfig::api());
            let router = posts_router(Arc::new(crate::InMemoryPostRepository::new()), gate, limiter);
            Self {
                router,
                users,
                config,
            }
        }

        async fn token_for(&self, username: &str) -> String {
            RegisterUseCase::new(self.users.clone(), self.config.clone())
                .execute(RegisterInput {
                    username: username.into(),
                    email: format!("{username}@example.com"),
                    password: "secret42".into(),
                })
                .await
                .unwrap()
                .token
        }

        async fn send(&self, method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let req = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let resp = self.router.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn create(&self, token: &str, title: &str) -> Value {
            let (status, value) = self
                .send("POST", "/", Some(json!({"title": title, "content": body()})), Some(token))
                .await;
            assert_eq!(status, StatusCode::CREATED, "{value}");
            value["data"]["post"].clone()
        }
    }

    #[tokio::test]
    async fn test_create_requires_login() {
        let app = TestApp::new();
        let (status, value) = app
            .send("POST", "/", Some(json!({"title": "Hello World", "content": body()})), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "You are not logged in. Please log in to get access.");
    }

    #[tokio::test]
    async fn test_create_and_fetch_envelope() {
        let app = TestApp::new();
        let token = app.token_for("alice").await;

        let (status, value) = app
            .send(
                "POST",
                "/",
                Some(json!({
                    "title": "  Hello World  ",
                    "imageURL": "https://example.com/a.png",
                    "content": body()
                })),
                Some(&token),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(value["message"], "Post created successfully");
        let post = &value["data"]["post"];
        assert_eq!(post["title"], "Hello World");
        assert_eq!(post["slug"], "hello-world");
        assert_eq!(post["imageURL"], "https://example.com/a.png");
        assert_eq!(post["username"], "alice");
        assert_eq!(post["author"].as_str().unwrap().len(), 24);
        assert!(post.get("createdAt").is_some());

        let id = post["id"].as_str().unwrap();
        for key in ["hello-world", id] {
            let (status, value) = app.send("GET", &format!("/{key}"), None, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(value["data"]["post"]["id"], id);
        }

        // A bad token on the optional route is ignored
        let (status, _) = app.send("GET", "/hello-world", None, Some("garbage")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_validation_envelope() {
        let app = TestApp::new();
        let token = app.token_for("alice").await;
        let (status, value) = app
            .send("POST", "/", Some(json!({"title": "abc"})), Some(&token))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], "Validation failed");
        let details: Vec<(&str, &str)> = value["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| (d["field"].as_str().unwrap(), d["message"].as_str().unwrap()))
            .collect();
        assert_eq!(
            details,
            vec![
                ("content", "Content must be at least 50 characters"),
                ("title", "Title must be 5-120 characters"),
            ]
        );
    }

    #[tokio::test]
    async fn test_mistyped_fields_are_reported_by_name() {
        let app = TestApp::new();
        let token = app.token_for("alice").await;
        let (status, value) = app
            .send(
                "POST",
                "/",
                Some(json!({"title": 1234, "imageURL": {"href": "x"}, "content": body()})),
                Some(&token),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], "Validation failed");
        let details: Vec<(&str, &str)> = value["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| (d["field"].as_str().unwrap(), d["message"].as_str().unwrap()))
            .collect();
        assert_eq!(
            details,
            vec![
                ("imageURL", "Please provide a valid URL"),
                ("title", "Title must be 5-120 characters"),
            ]
        );
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405_before_the_gate() {
        let app = TestApp::new();
        let token = app.token_for("alice").await;
        let post = app.create(&token, "Method Check Post").await;
        let uri = format!("/{}", post["id"].as_str().unwrap());

        for (method, uri) in [("POST", uri.as_str()), ("DELETE", "/"), ("POST", "/my-posts")] {
            let (status, _) = app.send(method, uri, None, None).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_update_and_delete_are_owner_only() {
        let app = TestApp::new();
        let alice = app.token_for("alice").await;
        let mallory = app.token_for("mallory").await;
        let post = app.create(&alice, "Owned By Alice").await;
        let uri = format!("/{}", post["id"].as_str().unwrap());

        let (status, value) = app
            .send("PATCH", &uri, Some(json!({"title": "Stolen Title"})), Some(&mallory))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(value["message"], "You are not authorized to update this post");

        let (status, _) = app.send("DELETE", &uri, None, Some(&mallory)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, value) = app
            .send("PUT", &uri, Some(json!({"title": "Renamed By Alice"})), Some(&alice))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["message"], "Post updated successfully");
        assert_eq!(value["data"]["post"]["slug"], "renamed-by-alice");

        let (status, value) = app.send("DELETE", &uri, None, Some(&alice)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["message"], "Post deleted successfully");
        assert_eq!(value["data"]["id"], post["id"]);

        let (status, value) = app.send("GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["message"], "Post not found");
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = TestApp::new();
        let token = app.token_for("alice").await;
        let (status, value) = app.send("DELETE", "/x", None, Some(&token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], "Invalid id: x");
    }

    #[tokio::test]
    async fn test_listing_routes() {
        let app = TestApp::new();
        let alice = app.token_for("alice").await;
        let bob = app.token_for("bob").await;
        for i in 0..3 {
            app.create(&alice, &format!("Alice post {i}")).await;
        }
        app.create(&bob, "Bob post zero").await;

        let (status, value) = app.send("GET", "/?limit=2&page=2", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let pagination = &value["data"]["pagination"];
        assert_eq!(pagination["currentPage"], 2);
        assert_eq!(pagination["totalPages"], 2);
        assert_eq!(pagination["totalPosts"], 4);
        assert_eq!(pagination["limit"], 2);
        assert_eq!(pagination["hasNextPage"], false);
        assert_eq!(pagination["hasPrevPage"], true);

        let (_, value) = app.send("GET", "/my-posts", None, Some(&bob)).await;
        assert_eq!(value["data"]["pagination"]["totalPosts"], 1);

        let (status, _) = app.send("GET", "/my-posts", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, value) = app.send("GET", "/user/alice", None, None).await;
        assert_eq!(value["data"]["posts"].as_array().unwrap().len(), 3);

        let (_, value) = app.send("GET", "/stats", None, None).await;
        assert_eq!(value["data"]["totalPosts"], 4);
        assert_eq!(value["data"]["totalUsers"], 2);
        assert_eq!(value["data"]["recentPosts"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_bad_list_query() {
        let app = TestApp::new();
        let (status, value) = app.send("GET", "/?limit=500&order=sideways", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<&str> = value["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["limit", "order"]);
    }
}
