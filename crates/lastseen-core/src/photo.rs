//! Photo acceptance policy shared by the upload sink and client staging.

use thiserror::Error;

pub const MAX_PHOTOS: usize = 5;
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Why a photo was refused. The messages are the ones the API returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhotoRejection {
  #[error("Too many files. Maximum is 5 files.")]
  TooMany,
  #[error("Only image files are allowed")]
  NotAnImage,
  #[error("File size too large. Maximum size is 5MB.")]
  TooLarge,
}

/// `true` for any `image/*` media type.
pub fn is_image(content_type: &str) -> bool {
  content_type
    .trim()
    .get(..6)
    .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Check one candidate photo given how many are already accepted.
pub fn check_photo(
  content_type: Option<&str>,
  size: usize,
  already_accepted: usize,
) -> Result<(), PhotoRejection> {
  if already_accepted >= MAX_PHOTOS {
    return Err(PhotoRejection::TooMany);
  }
  if !content_type.is_some_and(is_image) {
    return Err(PhotoRejection::NotAnImage);
  }
  if size > MAX_PHOTO_BYTES {
    return Err(PhotoRejection::TooLarge);
  }
  Ok(())
}
