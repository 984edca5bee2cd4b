//! Resource method groups
//!
//! Each group borrows a [`WFirmaClient`](crate::WFirmaClient), shapes the
//! endpoint path and XML body for one wFirma module, and delegates to
//! [`WFirmaClient::call`](crate::WFirmaClient::call).

pub mod company_accounts;
pub mod contractors;
pub mod invoices;

pub use company_accounts::CompanyAccounts;
pub use contractors::Contractors;
pub use invoices::Invoices;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt::Display;

/// Characters escaped in an id path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Formats an id as a single URL path segment
pub(crate) fn path_segment(id: impl Display) -> String {
    utf8_percent_encode(&id.to_string(), SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment_escapes_separators() {
        assert_eq!(path_segment(42), "42");
        assert_eq!(path_segment("1/../x?y#z"), "1%2F..%2Fx%3Fy%23z");
        assert_eq!(path_segment("a b%"), "a%20b%25");
        assert_eq!(path_segment("Łódź"), "%C5%81%C3%B3d%C5%BA");
    }
}
