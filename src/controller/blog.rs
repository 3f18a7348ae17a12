use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web, HttpResponse};

use chrono::Utc;

use serde::Deserialize;

use uuid::Uuid;

use crate::auth::Administrator;
use crate::controller::Envelope;
use crate::domain::{optional, parse_optional, required, PostStatus, Slug};
use crate::error::{RestError, RestResult};
use crate::model::{derive_excerpt, normalize_tags, AdminAccount, BlogPost, Seo};
use crate::repo::{Filter, Pagination, Sort, Store};

const LABEL: &str = "Blog post";

#[derive(Debug, Deserialize)]
pub struct PublicQuery {
    page: Option<u64>,
    limit: Option<u64>,
    tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    page: Option<u64>,
    limit: Option<u64>,
    status: Option<String>,
}

/// Blog post body for both create and partial update
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    title: Option<String>,
    slug: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    cover_image: Option<String>,
    cover_image_alt: Option<String>,
    status: Option<String>,
    tags: Option<Vec<String>>,
    seo: Option<Seo>,
}

/// Slug from an explicit value when one is given, otherwise from the title
fn slug_for(explicit: Option<String>, title: &str) -> Result<String, String> {
    let source = optional(explicit);
    Slug::derive(source.as_deref().unwrap_or(title)).map(String::from)
}

impl PostBody {
    fn into_post(self, author_id: Uuid, author_name: String) -> Result<BlogPost, String> {
        let title = required("title", self.title)?;
        let content = required("content", self.content)?;
        let slug = slug_for(self.slug, &title)?;
        let excerpt = optional(self.excerpt).unwrap_or_else(|| derive_excerpt(&content));
        let status = parse_optional::<PostStatus>(self.status)?.unwrap_or_default();

        let now = Utc::now();
        let mut post = BlogPost {
            id: Uuid::new_v4(),
            title,
            slug,
            content,
            excerpt,
            cover_image: optional(self.cover_image),
            cover_image_alt: optional(self.cover_image_alt),
            author_id,
            author_name,
            status: PostStatus::Draft,
            tags: normalize_tags(self.tags.unwrap_or_default()),
            seo: self.seo.unwrap_or_default(),
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        post.set_status(status);
        Ok(post)
    }

    /// Apply the fields present in the body. The slug only changes when given explicitly.
    fn apply_to(self, post: &mut BlogPost) -> Result<(), String> {
        if self.title.is_some() {
            post.title = required("title", self.title)?;
        }
        if self.slug.is_some() {
            post.slug = slug_for(self.slug, &post.title)?;
        }
        if self.content.is_some() {
            post.content = required("content", self.content)?;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = optional(Some(excerpt)).unwrap_or_else(|| derive_excerpt(&post.content));
        }
        if let Some(cover_image) = self.cover_image {
            post.cover_image = optional(Some(cover_image));
        }
        if let Some(cover_image_alt) = self.cover_image_alt {
            post.cover_image_alt = optional(Some(cover_image_alt));
        }
        if let Some(tags) = self.tags {
            post.tags = normalize_tags(tags);
        }
        if let Some(seo) = self.seo {
            post.seo = seo;
        }
        if let Some(status) = parse_optional::<PostStatus>(self.status)? {
            post.set_status(status);
        }
        post.touch();
        Ok(())
    }
}

fn published() -> Filter {
    Filter::new().eq("status", PostStatus::Published.as_ref())
}

#[tracing::instrument(name = "List published blog posts", skip(store))]
#[get("")]
async fn list_published(
    query: web::Query<PublicQuery>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let query = query.into_inner();
    let tag = optional(query.tag).map(|tag| tag.to_lowercase());
    let filter = match tag {
        Some(tag) => published().has("tags", tag),
        None => published(),
    };

    let page = store
        .list::<BlogPost>(
            &filter,
            Sort::newest_first("publishedAt"),
            Pagination::new(query.page, query.limit),
        )
        .await?;

    Ok(Envelope::page(page).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Fetch published blog post by slug", skip(store))]
#[get("/{slug}")]
async fn get_published(
    path: web::Path<String>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let filter = published().eq("slug", path.into_inner());
    let post = store
        .find_one::<BlogPost>(&filter)
        .await?
        .ok_or_else(|| RestError::not_found(LABEL))?;

    Ok(Envelope::data(post).respond(StatusCode::OK))
}

#[tracing::instrument(name = "List blog posts", skip(store))]
#[get("")]
async fn list(
    _admin: Administrator,
    query: web::Query<AdminQuery>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let query = query.into_inner();
    let status = parse_optional::<PostStatus>(query.status).map_err(RestError::ParseError)?;
    let filter = Filter::new().eq_opt("status", status.map(|s| s.as_ref().to_owned()));

    let page = store
        .list::<BlogPost>(
            &filter,
            Sort::newest_first("createdAt"),
            Pagination::new(query.page, query.limit),
        )
        .await?;

    Ok(Envelope::page(page).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Create blog post", skip(body, store))]
#[post("")]
async fn create(
    admin: Administrator,
    body: web::Json<PostBody>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let author_name = store
        .get::<AdminAccount>(admin.id())
        .await?
        .map(|account| account.name)
        .unwrap_or_else(|| admin.email().to_string());

    let post = body
        .into_inner()
        .into_post(admin.id(), author_name)
        .map_err(RestError::ParseError)?;
    store.insert(&post).await?;

    Ok(Envelope::data(post)
        .with_message("Blog post created")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Fetch blog post", skip(store))]
#[get("/{id}")]
async fn show(
    _admin: Administrator,
    path: web::Path<Uuid>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let post = store
        .get::<BlogPost>(path.into_inner())
        .await?
        .ok_or_else(|| RestError::not_found(LABEL))?;

    Ok(Envelope::data(post).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Update blog post", skip(body, store))]
#[put("/{id}")]
async fn update(
    _admin: Administrator,
    path: web::Path<Uuid>,
    body: web::Json<PostBody>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let mut post = store
        .get::<BlogPost>(path.into_inner())
        .await?
        .ok_or_else(|| RestError::not_found(LABEL))?;

    body.into_inner()
        .apply_to(&mut post)
        .map_err(RestError::ParseError)?;
    if !store.replace(&post).await? {
        return Err(RestError::not_found(LABEL));
    }

    Ok(Envelope::data(post)
        .with_message("Blog post updated")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Delete blog post", skip(store))]
#[delete("/{id}")]
async fn remove(
    _admin: Administrator,
    path: web::Path<Uuid>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    if !store.delete::<BlogPost>(path.into_inner()).await? {
        return Err(RestError::not_found(LABEL));
    }

    Ok(Envelope::message("Blog post deleted").respond(StatusCode::OK))
}

/// Public blog endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/blog")
        .service(list_published)
        .service(get_published)
}

/// Admin blog endpoints
pub fn admin_scope() -> impl HttpServiceFactory {
    web::scope("/blog")
        .service(list)
        .service(create)
        .service(show)
        .service(update)
        .service(remove)
}
