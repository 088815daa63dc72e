use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use uuid::Uuid;

/// Owner of [`COMPANY_ID`]
pub const OWNER_ID: Uuid = Uuid::from_u128(0x6f1c_0000_0000_4000_8000_0000_0000_0001);
/// Authenticated member that owns nothing
pub const STRANGER_ID: Uuid = Uuid::from_u128(0x6f1c_0000_0000_4000_8000_0000_0000_0002);
pub const ADMIN_ID: Uuid = Uuid::from_u128(0x6f1c_0000_0000_4000_8000_0000_0000_0003);

pub const COMPANY_ID: Uuid = Uuid::from_u128(0x0b4e_7f52_3c1a_4d8e_9f6b_2a7c_5d1e_8f30);
pub const MISSING_COMPANY_ID: Uuid = Uuid::from_u128(0x0b4e_7f52_3c1a_4d8e_9f6b_2a7c_5d1e_ffff);

/// Smallest byte string that looks like a PDF.
pub fn minimal_pdf() -> Bytes {
    Bytes::from_static(b"%PDF-1.4\n1 0 obj<<>>endobj\ntrailer<<>>\n%%EOF\n")
}

pub fn pdf_part(filename: &str) -> Part {
    Part::bytes(minimal_pdf())
        .file_name(filename)
        .mime_type("application/pdf")
}

/// Upload form with a company and a PDF file; add further fields with
/// `add_text`.
pub fn upload_form(company_id: Uuid, filename: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("companyId", company_id.to_string())
        .add_part("file", pdf_part(filename))
}
