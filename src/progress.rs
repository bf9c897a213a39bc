//! Progress bar display for packing

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for the packing step
pub struct PackProgress {
    file_pb: ProgressBar,
}

impl PackProgress {
    /// Create a new progress display with the total file count
    #[allow(clippy::unwrap_used)] // static template string
    pub fn new(total_files: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-");

        let file_pb = ProgressBar::new(total_files);
        file_pb.set_style(style);

        Self { file_pb }
    }

    /// Update to show the file currently being written
    pub fn update_file(&self, file_path: &str) {
        // Truncate long paths for display
        let display_path = if file_path.len() > 50
            && file_path.is_char_boundary(file_path.len() - 47)
        {
            format!("...{}", &file_path[file_path.len() - 47..])
        } else {
            file_path.to_string()
        };
        self.file_pb.set_message(display_path);
        self.file_pb.inc(1);
    }

    /// Finish the bar once the archive is closed
    pub fn finish(&self) {
        self.file_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.file_pb.abandon();
    }
}
