//! Cleaning-activity logs with their photo/video evidence links.

use anyhow::{bail, Result};
use log::info;

use shared::{CleaningLog, CreateCleaningLogRequest, MediaQueryResponse};

use crate::domain::date_range::{date_prefix, parse_date};
use crate::storage::csv::{CleaningRepository, CsvConnection};

/// The activity areas the media browser knows about.
pub const CLEANING_AREAS: [&str; 5] = ["material", "vessel", "prep", "packing", "cooking"];

#[derive(Clone)]
pub struct CleaningService {
    repository: CleaningRepository,
}

impl CleaningService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            repository: CleaningRepository::new(connection),
        }
    }

    pub fn list(&self) -> Result<Vec<CleaningLog>> {
        self.repository.list()
    }

    pub fn create(&self, request: CreateCleaningLogRequest) -> Result<CleaningLog> {
        parse_date(&request.log_date)?;

        let area = request.area.trim().to_lowercase();
        if !CLEANING_AREAS.contains(&area.as_str()) {
            bail!(
                "Unknown cleaning area \"{}\" (expected one of: {})",
                request.area,
                CLEANING_AREAS.join(", ")
            );
        }
        if request.photo_url.trim().is_empty() && request.video_url.trim().is_empty() {
            bail!("A photo or video link is required");
        }

        let log = CleaningLog {
            log_date: date_prefix(&request.log_date).to_string(),
            area,
            photo_url: request.photo_url.trim().to_string(),
            video_url: request.video_url.trim().to_string(),
            remarks: request.remarks.trim().to_string(),
            created_by: request.created_by,
        };

        self.repository.store(log.clone())?;
        info!("Logged {} cleaning for {}", log.area, log.log_date);

        Ok(log)
    }

    /// Media recorded for a date and area, with photo/video tallies for
    /// the browser's summary line.
    pub fn media_for(&self, date: &str, area: &str) -> Result<MediaQueryResponse> {
        parse_date(date)?;

        let items = self.repository.for_date_and_area(date, area)?;
        let photo_count = items.iter().filter(|m| !m.photo_url.is_empty()).count();
        let video_count = items.iter().filter(|m| !m.video_url.is_empty()).count();

        Ok(MediaQueryResponse {
            items,
            photo_count,
            video_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> CleaningService {
        let temp_dir = tempdir().unwrap();
        let conn = CsvConnection::new(temp_dir.path().to_path_buf()).unwrap();
        let _ = temp_dir.keep(); // persist temp dir for the test's lifetime
        CleaningService::new(conn)
    }

    fn log(area: &str, photo: &str, video: &str) -> CreateCleaningLogRequest {
        CreateCleaningLogRequest {
            log_date: "2024-04-01".to_string(),
            area: area.to_string(),
            photo_url: photo.to_string(),
            video_url: video.to_string(),
            remarks: String::new(),
            created_by: "cleaner".to_string(),
        }
    }

    #[test]
    fn test_create_normalizes_area() {
        let service = setup();
        let created = service.create(log("Vessel", "http://cdn/p1.jpg", "")).unwrap();
        assert_eq!(created.area, "vessel");
    }

    #[test]
    fn test_create_rejects_unknown_area_and_empty_media() {
        let service = setup();
        assert!(service.create(log("garage", "http://cdn/p1.jpg", "")).is_err());
        assert!(service.create(log("vessel", " ", " ")).is_err());
    }

    #[test]
    fn test_media_query_counts_photos_and_videos() {
        let service = setup();
        service.create(log("vessel", "http://cdn/p1.jpg", "")).unwrap();
        service.create(log("vessel", "http://cdn/p2.jpg", "http://cdn/v1.mp4")).unwrap();
        service.create(log("prep", "http://cdn/p3.jpg", "")).unwrap();

        let media = service.media_for("2024-04-01", "vessel").unwrap();
        assert_eq!(media.items.len(), 2);
        assert_eq!(media.photo_count, 2);
        assert_eq!(media.video_count, 1);
    }
}
