//! Object key layout.
//!
//! Every asset lives under a prefix owned by its entity, and the object name
//! is the field it fills plus the extension of the uploaded file:
//!
//! - creators: `creators/{slug}/{field}{ext}`
//! - comics: `comics/{slug}/{field}{ext}`
//! - issues: `comics/{comic_slug}/issues/{issue_slug}/{field}{ext}`
//! - pages: `{issue prefix}/pages/{page_id}/{field}{ext}`
//! - carousel slides: `carousel/slides/{id}/{field}{ext}`
//!
//! Removing an entity deletes everything under its prefix, so a comic's
//! prefix also covers its issues and their pages.

use std::path::Path;
use uuid::Uuid;

pub fn creator_prefix(slug: &str) -> String {
    format!("creators/{slug}")
}

pub fn comic_prefix(slug: &str) -> String {
    format!("comics/{slug}")
}

pub fn issue_prefix(comic_slug: &str, issue_slug: &str) -> String {
    format!("comics/{comic_slug}/issues/{issue_slug}")
}

/// Pages are keyed by id, not number, so a rejected page can never share a
/// key with a saved one.
pub fn page_prefix(issue_prefix: &str, page_id: &Uuid) -> String {
    format!("{issue_prefix}/pages/{page_id}")
}

pub fn slide_prefix(id: &Uuid) -> String {
    format!("carousel/slides/{id}")
}

/// `{prefix}/{field}{ext}` where `ext` is the lowercased extension of
/// `file_name`, dot included.
pub fn file_key(prefix: &str, field: &str, file_name: &str) -> String {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if extension.is_empty() {
        format!("{prefix}/{field}")
    } else {
        format!("{prefix}/{field}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_keeps_the_uploaded_extension() {
        assert_eq!(
            file_key(&comic_prefix("hero-tales"), "cover", "Front.PNG"),
            "comics/hero-tales/cover.png"
        );
        assert_eq!(
            file_key(&creator_prefix("studio-x"), "avatar", "avatar"),
            "creators/studio-x/avatar"
        );
    }

    #[test]
    fn nested_prefixes_stay_under_the_comic() {
        let issue = issue_prefix("hero-tales", "the-beginning");
        assert!(issue.starts_with(&comic_prefix("hero-tales")));

        let page_id = Uuid::nil();
        assert_eq!(
            file_key(&page_prefix(&issue, &page_id), "image", "p3.jpg"),
            format!("comics/hero-tales/issues/the-beginning/pages/{page_id}/image.jpg")
        );
    }
}
