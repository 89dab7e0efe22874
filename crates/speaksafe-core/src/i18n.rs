//! Localized user-facing notices.

use crate::models::Language;

/// A notice shown to the person filing a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    FileTooLarge { file_name: String },
    FileTypeNotAllowed { file_name: String },
    FileProcessingFailed { file_name: String },
    DepartmentRequired,
    SubmissionSucceeded,
    SubmissionFailed,
}

impl Notice {
    pub fn message(&self, language: Language) -> String {
        match (self, language) {
            (Notice::FileTooLarge { file_name }, Language::En) => {
                format!("File \"{}\" exceeds 10MB limit", file_name)
            }
            (Notice::FileTooLarge { file_name }, Language::Ar) => {
                format!("الملف \"{}\" يتجاوز حد 10 ميجابايت", file_name)
            }
            (Notice::FileTypeNotAllowed { file_name }, Language::En) => {
                format!("File type not allowed: \"{}\"", file_name)
            }
            (Notice::FileTypeNotAllowed { file_name }, Language::Ar) => {
                format!("نوع الملف غير مسموح به: \"{}\"", file_name)
            }
            (Notice::FileProcessingFailed { file_name }, Language::En) => {
                format!("Error processing file \"{}\". Please try again.", file_name)
            }
            (Notice::FileProcessingFailed { file_name }, Language::Ar) => {
                format!("خطأ في معالجة الملف \"{}\". يرجى المحاولة مرة أخرى.", file_name)
            }
            (Notice::DepartmentRequired, Language::En) => "Please select a department".into(),
            (Notice::DepartmentRequired, Language::Ar) => "يرجى اختيار قسم".into(),
            (Notice::SubmissionSucceeded, Language::En) => "Report submitted securely.".into(),
            (Notice::SubmissionSucceeded, Language::Ar) => "تم تقديم البلاغ بأمان.".into(),
            (Notice::SubmissionFailed, Language::En) => {
                "Error submitting report. Please try again or contact support.".into()
            }
            (Notice::SubmissionFailed, Language::Ar) => {
                "خطأ في تقديم البلاغ. يرجى المحاولة مرة أخرى أو الاتصال بالدعم.".into()
            }
        }
    }
}
