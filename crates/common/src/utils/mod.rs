/// Input/output utilities for file manipulation.
pub mod io;

/// String manipulation and formatting utilities.
pub mod strings;

/// Threading and multi-threading utilities.
pub mod threading;

/// Version handling and management utilities.
pub mod version;
