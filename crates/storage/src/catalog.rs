//! Lecture catalog - supplies the total duration progress is measured against.

use async_trait::async_trait;
use lectrack_core::{Lecture, LectureId};

/// Read-only source of lectures.
#[async_trait]
pub trait LectureCatalog: Send + Sync {
    /// All lectures, in catalog order.
    async fn list(&self) -> Vec<Lecture>;

    /// Look up a lecture by id.
    async fn get_by_id(&self, id: LectureId) -> Option<Lecture>;
}

/// Catalog backed by a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    lectures: Vec<Lecture>,
}

impl StaticCatalog {
    /// Build a catalog from lectures.
    pub fn new(lectures: Vec<Lecture>) -> Self {
        Self { lectures }
    }

    /// The demo course shipped with the application.
    pub fn builtin() -> Self {
        const BUCKET: &str = "https://storage.googleapis.com/gtv-videos-bucket/sample";

        Self::new(vec![
            Lecture::new(1, "Introduction to React Hooks", 734)
                .with_description(
                    "Learn how to use React Hooks to manage state and side effects in \
                     functional components.",
                )
                .with_video_url(format!("{BUCKET}/TearsOfSteel.mp4")),
            Lecture::new(2, "Advanced TypeScript Patterns", 888)
                .with_description(
                    "Generics, conditional types, mapped types and utility types.",
                )
                .with_video_url(format!("{BUCKET}/Sintel.mp4")),
            Lecture::new(3, "Building Responsive UIs with Tailwind CSS", 596)
                .with_description("Core concepts, responsive design and customization.")
                .with_video_url(format!("{BUCKET}/SubaruOutbackOnStreetAndDirt.mp4")),
            Lecture::new(4, "Next.js Server Components", 470)
                .with_description(
                    "How Server Components differ from Client Components and when to use each.",
                )
                .with_video_url(format!("{BUCKET}/WeAreGoingOnBullrun.mp4")),
            Lecture::new(5, "State Management with Redux Toolkit", 653)
                .with_description("Slices, thunks and integration with React applications.")
                .with_video_url(format!("{BUCKET}/WhatCarCanYouGetForAGrand.mp4")),
            Lecture::new(6, "Building APIs with Node.js and Express", 653)
                .with_description("Routing, middleware, error handling and databases.")
                .with_video_url(format!("{BUCKET}/ElephantsDream.mp4")),
        ])
    }

    /// Number of lectures.
    pub fn len(&self) -> usize {
        self.lectures.len()
    }

    /// Catalog has no lectures.
    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }
}

#[async_trait]
impl LectureCatalog for StaticCatalog {
    async fn list(&self) -> Vec<Lecture> {
        self.lectures.clone()
    }

    async fn get_by_id(&self, id: LectureId) -> Option<Lecture> {
        self.lectures.iter().find(|l| l.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_catalog() {
        let catalog = StaticCatalog::builtin();
        assert_eq!(catalog.len(), 6);

        let lecture = catalog.get_by_id(LectureId::new(1)).await.unwrap();
        assert_eq!(lecture.duration_in_seconds, 734);
        assert_eq!(lecture.formatted_duration(), "12:14");
        assert!(lecture.video_url.ends_with("TearsOfSteel.mp4"));
    }

    #[tokio::test]
    async fn test_unknown_lecture() {
        let catalog = StaticCatalog::builtin();
        assert!(catalog.get_by_id(LectureId::new(99)).await.is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_order() {
        let catalog = StaticCatalog::new(vec![Lecture::new(9, "b", 10), Lecture::new(2, "a", 20)]);
        let ids: Vec<u32> = catalog.list().await.iter().map(|l| l.id.get()).collect();
        assert_eq!(ids, vec![9, 2]);
    }
}
