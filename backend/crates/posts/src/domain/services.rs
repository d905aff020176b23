//! Domain Services

use crate::domain::repository::PostRepository;
use crate::domain::value_object::{post_id::PostId, slug::Slug};
use crate::error::PostResult;

/// First unused slug for `title`: the base, then `base-1`, `base-2`, ...
///
/// `except` excludes the post being retitled. The scan and the later write
/// are not atomic; the store's unique slug constraint decides a race.
pub async fn allocate_slug<R>(repo: &R, title: &str, except: Option<&PostId>) -> PostResult<Slug>
where
    R: PostRepository,
{
    let base = Slug::from_title(title);
    let mut n = 0;
    loop {
        let candidate = base.candidate(n);
        if !repo.slug_exists(&candidate, except).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}
