//! Fixed user-facing texts

pub const START_MESSAGE: &str = "👋 Welcome to JU Placement Checker!\n\nPlease send your *Admission Number* or *ID* to check your placement.";

pub const ABOUT_MESSAGE: &str = "About
This bot is developed by JU Students Network 🚀

Features:
• Fast & simple access to placement results
• Official data directly fetched from JU portal
• Privacy-first: We do not store your personal info
• 24/7 bot availability

Our mission:
Help JU students receive important updates faster, easier, and stress-free.

For announcements and support, join our community:
📢 JU Students Network Channel
@JUStudentsNetwork";

pub const FORMAT_WARNING: &str =
    "⚠️ Please check your admission number format. It should be between 3-20 digits.";

pub const PROCESSING_MESSAGE: &str = "🔍 Checking your placement, please wait...";

pub const NOT_FOUND_MESSAGE: &str =
    "❌ Admission number not found or invalid. Please check your admission number and try again.";

pub const TIMEOUT_MESSAGE: &str =
    "⏰ Request timeout. The portal is taking too long to respond. Please try again later.";

pub const CONNECT_MESSAGE: &str =
    "🌐 Cannot connect to JU portal. Please check your internet connection and try again.";

pub const UNAVAILABLE_MESSAGE: &str = "🔧 JU portal is currently unavailable. Please try again later.";

pub const FETCH_ERROR_MESSAGE: &str = "⚠️ Error fetching data. Please try again later.";

/// Sent by the transport when handling a message failed outright
pub const INTERNAL_ERROR_MESSAGE: &str = "❌ An error occurred. Please try again later.";

pub const RESULT_TITLE: &str = "🎓 *Jimma University Placement Result*";

pub const RESULT_FOOTER: &str = "*Get more information on @JUStudentsNetwork!*";

/// Shown in place of an empty field
pub const MISSING_FIELD: &str = "N/A";
