use chrono::Utc;

use super::sanitize::prompt_slug;
use crate::constants::ARTIFACT_EXTENSION;

/// `<unix-timestamp>_<prompt-slug>.stl`
///
/// Names only differ per second, so two saves with the same prompt inside one
/// second map to the same file.
pub fn artifact_filename(prompt: &str) -> String {
    artifact_filename_at(Utc::now().timestamp(), prompt)
}

pub fn artifact_filename_at(timestamp: i64, prompt: &str) -> String {
    format!("{}_{}.{}", timestamp, prompt_slug(prompt), ARTIFACT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_filename_at() {
        assert_eq!(
            artifact_filename_at(1718000000, "a 10mm wheel!"),
            "1718000000_a_10mm_wheel.stl"
        );
        assert_eq!(artifact_filename_at(5, ""), "5_.stl");
    }

    #[test]
    fn test_artifact_filename_uses_current_time() {
        let before = Utc::now().timestamp();
        let name = artifact_filename("gear");
        let (stamp, rest) = name.split_once('_').unwrap();
        assert!(stamp.parse::<i64>().unwrap() >= before);
        assert_eq!(rest, "gear.stl");
    }
}
