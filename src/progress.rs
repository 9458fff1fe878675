//! Utilities for creating and styling progress bars using the `indicatif` crate.
//!
//! Sketching a chromosome can touch hundreds of millions of positions, so each set gets
//! its own bar labelled with the set name.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar of a specified length and styling, with a terminal message.
pub fn progress_bar_msg(len: u64, msg: String) -> ProgressBar {
    let progress_bar = ProgressBar::new(len);
    progress_bar.set_style(ProgressStyle::default_bar().template(
        "[{elapsed_precise}] {bar:20.cyan/blue} {percent}% [{human_pos}/{human_len}] [Remaining: {eta}] [{msg}]",
    ).expect("Invalid progress style."));
    progress_bar.set_message(msg);

    progress_bar
}
