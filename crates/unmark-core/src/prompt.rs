//! Natural-language instruction sent to every provider.

/// Build the edit instruction for a removal target.
pub fn removal_instruction(removal_text: &str) -> String {
    format!(
        "Remove {removal_text} from this image while preserving the original image quality \
         and content. Keep the image exactly the same except for removing the {removal_text}."
    )
}
