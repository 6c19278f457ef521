//! Named constants for fully-qualified gRPC method paths.
//!
//! These are the keys of the server's role table, so they must match the
//! paths tonic routes on.

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

/// `/pcbook.v1.AuthService/Login`
pub const METHOD_LOGIN: &str = "/pcbook.v1.AuthService/Login";

// ---------------------------------------------------------------------------
// LaptopService
// ---------------------------------------------------------------------------

/// `/pcbook.v1.LaptopService/CreateLaptop`
pub const METHOD_CREATE_LAPTOP: &str = "/pcbook.v1.LaptopService/CreateLaptop";

/// `/pcbook.v1.LaptopService/SearchLaptop`
pub const METHOD_SEARCH_LAPTOP: &str = "/pcbook.v1.LaptopService/SearchLaptop";

/// `/pcbook.v1.LaptopService/UploadImage`
pub const METHOD_UPLOAD_IMAGE: &str = "/pcbook.v1.LaptopService/UploadImage";

/// `/pcbook.v1.LaptopService/AddRating`
pub const METHOD_ADD_RATING: &str = "/pcbook.v1.LaptopService/AddRating";
