//! Element identifiers for the output tree.

use uuid::Uuid;

/// Length of a generated element id.
pub const ID_LEN: usize = 7;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a random 7-character lowercase alphanumeric id.
///
/// Ids carry no meaning; they only have to look like the ones the page
/// builder generates itself.
pub fn generate_id() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(ID_LEN);
    for _ in 0..ID_LEN {
        id.push(ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    id
}

/// Whether a string has the shape of a generated id.
pub fn is_element_id(s: &str) -> bool {
    s.len() == ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}
