//! Report email subject and body rendering (English / Arabic).

use chrono::{DateTime, Utc};

use crate::models::{Department, Language, ReportForm};

const RULE: &str = "═══════════════════════════════════════";

/// Subject line for a report, e.g. `[CONFIDENTIAL] Whistleblower Report - Finance`.
pub fn report_subject(department: Option<Department>, language: Language) -> String {
    match language {
        Language::En => {
            let name = department.map_or("General", |d| d.display_name(Language::En));
            format!("[CONFIDENTIAL] Whistleblower Report - {}", name)
        }
        Language::Ar => {
            let name = department.map_or("عام", |d| d.display_name(Language::Ar));
            format!("[سري] بلاغ المبلغين عن المخالفات - {}", name)
        }
    }
}

fn or_default<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}

/// Plain-text report body.
pub fn report_text(form: &ReportForm, language: Language, received_at: DateTime<Utc>) -> String {
    let received = received_at.format("%Y-%m-%d %H:%M UTC");
    let separator = "-".repeat(50);

    match language {
        Language::En => {
            let department = form
                .department
                .map_or("Unspecified", |d| d.display_name(Language::En));
            format!(
                "New Confidential Whistleblower Report\n\n{RULE}\n\n\
                 REPORT DETAILS:\n{separator}\n\n\
                 Department: {department}\n\n\
                 Name: {name}\nEmail: {email}\nSite: {site}\n\n{RULE}\n\n\
                 REPORT CONTENT:\n\n{message}\n\n{RULE}\n\n\
                 IMPORTANT NOTICE:\n\
                 • This report is confidential and must be handled per whistleblower protection policy\n\
                 • Embedded metadata (EXIF) was removed from image attachments; documents and other files are forwarded unchanged\n\
                 • Please treat this information with strict confidentiality\n\
                 • Response to this report is required within 48 hours\n\n\
                 Date Received: {received}\n\n{RULE}\n\n\
                 This report was submitted through the SpeakSafe platform",
                name = or_default(&form.name, "Anonymous"),
                email = or_default(&form.email, "Not provided"),
                site = or_default(&form.site, "Not specified"),
                message = form.message.trim(),
            )
        }
        Language::Ar => {
            let department = form
                .department
                .map_or("غير محدد", |d| d.display_name(Language::Ar));
            format!(
                "تقرير بلاغ سري جديد\n\n{RULE}\n\n\
                 تفاصيل التقرير:\n{separator}\n\n\
                 القسم المعني: {department}\n\n\
                 الاسم: {name}\nالبريد الإلكتروني: {email}\nالموقع: {site}\n\n{RULE}\n\n\
                 تفاصيل البلاغ:\n\n{message}\n\n{RULE}\n\n\
                 تنويه:\n\
                 • هذا البلاغ سري ويجب معالجته وفقاً لسياسة حماية المبلغين\n\
                 • تمت إزالة البيانات الوصفية (EXIF) من الصور المرفقة فقط، أما المستندات والملفات الأخرى فتُرسل كما هي\n\
                 • يرجى التعامل مع هذه المعلومات بسرية تامة\n\
                 • الرد على هذا البلاغ خلال 48 ساعة مطلوب\n\n\
                 تاريخ الاستلام: {received}\n\n{RULE}\n\n\
                 هذا البلاغ تم إرساله عبر منصة SpeakSafe",
                name = or_default(&form.name, "مجهول"),
                email = or_default(&form.email, "غير مقدم"),
                site = or_default(&form.site, "غير محدد"),
                message = form.message.trim(),
            )
        }
    }
}

/// HTML report body: the plain-text rendering, escaped, with whitespace preserved.
pub fn report_body(form: &ReportForm, language: Language, received_at: DateTime<Utc>) -> String {
    let text = report_text(form, language, received_at);
    let dir = if language.is_rtl() { "rtl" } else { "ltr" };
    format!(
        "<div dir=\"{}\" style=\"font-family: Arial, sans-serif; white-space: pre-wrap;\">{}</div>",
        dir,
        escape_html(&text)
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
