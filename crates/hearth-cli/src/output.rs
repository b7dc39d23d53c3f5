//! Table formatting helpers for CLI output.

use comfy_table::{ContentArrangement, Table};

use hearth_images::ImageSummary;

/// Create a borderless table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// Listing of available images, one row per manifest.
pub fn image_table(summaries: &[ImageSummary]) -> Table {
    let mut table = new_table(&["UID", "Image Name", "Author", "Default Image"]);
    for summary in summaries {
        table.add_row(vec![
            summary.uid.clone(),
            summary.name.clone(),
            summary.author.clone(),
            if summary.default_image { "yes" } else { "no" }.to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(uid: &str, name: &str, author: &str, default_image: bool) -> ImageSummary {
        ImageSummary {
            uid: uid.to_string(),
            name: name.to_string(),
            author: author.to_string(),
            default_image,
        }
    }

    /// Non-blank lines of a rendered table.
    fn rows(rendered: &str) -> Vec<&str> {
        rendered
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    /// Column of `needle` in `line`, counted in characters.
    fn column_of(line: &str, needle: &str) -> usize {
        let byte = line.find(needle).unwrap();
        line[..byte].chars().count()
    }

    #[test]
    fn test_image_table_headers_and_rows() {
        let rendered = image_table(&[
            summary("default-vanilla-minecraft", "Vanilla Minecraft", "alice", true),
            summary("custom-modded", "Modded", "bob", false),
        ])
        .to_string();

        let lines = rows(&rendered);
        assert_eq!(lines.len(), 3);
        for header in ["UID", "Image Name", "Author", "Default Image"] {
            assert!(lines[0].contains(header), "{}", rendered);
        }
        assert!(lines[1].contains("default-vanilla-minecraft"));
        assert!(lines[1].contains("yes"));
        assert!(lines[2].contains("custom-modded"));
        assert!(lines[2].contains("no"));
    }

    #[test]
    fn test_non_ascii_names_keep_columns_aligned() {
        let rendered = image_table(&[
            summary("uberserver", "Überserver Ω", "alice", true),
            summary("vanilla", "Vanilla", "bob", false),
        ])
        .to_string();

        let lines = rows(&rendered);
        let header = column_of(lines[0], "Author");
        assert_eq!(column_of(lines[1], "alice"), header, "{}", rendered);
        assert_eq!(column_of(lines[2], "bob"), header, "{}", rendered);
    }

    #[test]
    fn test_empty_listing_has_only_headers() {
        let rendered = image_table(&[]).to_string();
        assert_eq!(rows(&rendered).len(), 1);
        assert!(rendered.contains("Default Image"));
    }
}
