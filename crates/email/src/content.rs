//! Shared email content templates
//!
//! Canonical content generators for project lifecycle emails, used by both
//! production (SES) and mock email services.

/// Lifecycle moment an email is sent for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEmailKind {
    /// To the translator picked for a project
    TranslatorAssigned,
    /// To the customer when no translator speaks the language
    ClosedWithoutTranslator,
    /// To the customer once the translated file is uploaded
    TranslationAvailable,
    /// To the translator when the customer approves the work
    TranslationAccepted,
    /// To the translator when the customer rejects the work
    TranslationRejected { feedback: String },
    /// To the translator when an administrator closes the project
    ProjectClosed,
}

impl ProjectEmailKind {
    /// Value stored under the `email_type` metadata key
    pub fn email_type(&self) -> &'static str {
        match self {
            ProjectEmailKind::TranslatorAssigned => "translator_assigned",
            ProjectEmailKind::ClosedWithoutTranslator => "closed_without_translator",
            ProjectEmailKind::TranslationAvailable => "translation_available",
            ProjectEmailKind::TranslationAccepted => "translation_accepted",
            ProjectEmailKind::TranslationRejected { .. } => "translation_rejected",
            ProjectEmailKind::ProjectClosed => "project_closed",
        }
    }
}

/// Everything a lifecycle email needs to render
#[derive(Debug, Clone)]
pub struct ProjectEmail<'a> {
    pub recipient_name: &'a str,
    pub project_name: &'a str,
    pub language: &'a str,
    pub project_url: &'a str,
    pub kind: &'a ProjectEmailKind,
}

/// Subject line for a lifecycle email
pub fn subject(email: &ProjectEmail<'_>) -> String {
    let name = email.project_name;
    match email.kind {
        ProjectEmailKind::TranslatorAssigned => format!("New translation project: {}", name),
        ProjectEmailKind::ClosedWithoutTranslator => {
            format!("No translator available for {}", name)
        }
        ProjectEmailKind::TranslationAvailable => format!("Your translation is ready: {}", name),
        ProjectEmailKind::TranslationAccepted => format!("Translation approved: {}", name),
        ProjectEmailKind::TranslationRejected { .. } => format!("Translation rejected: {}", name),
        ProjectEmailKind::ProjectClosed => format!("Project closed: {}", name),
    }
}

/// One-paragraph summary of what happened, shared by text and HTML bodies
fn summary(email: &ProjectEmail<'_>) -> String {
    let name = email.project_name;
    let language = email.language;
    match email.kind {
        ProjectEmailKind::TranslatorAssigned => format!(
            "You have been assigned the project '{}' for translation into {}.",
            name, language
        ),
        ProjectEmailKind::ClosedWithoutTranslator => format!(
            "Unfortunately no translator is currently available for {}, so the project '{}' has been closed.",
            language, name
        ),
        ProjectEmailKind::TranslationAvailable => format!(
            "The {} translation of your project '{}' has been uploaded and is ready for review.",
            language, name
        ),
        ProjectEmailKind::TranslationAccepted => format!(
            "The customer has approved your translation of '{}'.",
            name
        ),
        ProjectEmailKind::TranslationRejected { .. } => format!(
            "The customer has rejected your translation of '{}'. Please review the feedback and upload a revised file.",
            name
        ),
        ProjectEmailKind::ProjectClosed => format!("The project '{}' has been closed.", name),
    }
}

/// Generate plain-text body for a lifecycle email.
pub fn body_text(email: &ProjectEmail<'_>) -> String {
    let mut text = format!("Hi {},\n\n{}\n\n", email.recipient_name, summary(email));
    if let ProjectEmailKind::TranslationRejected { feedback } = email.kind {
        text.push_str(&format!("Feedback:\n{}\n\n", feedback));
    }
    text.push_str(&format!(
        "View the project:\n{}\n\nThanks,\nThe Lingodesk Team",
        email.project_url
    ));
    text
}

/// Generate styled HTML body for a lifecycle email.
pub fn body_html(email: &ProjectEmail<'_>) -> String {
    let feedback = match email.kind {
        ProjectEmailKind::TranslationRejected { feedback } => format!(
            r#"<blockquote style="border-left: 3px solid #c0392b; margin: 20px 0; padding: 10px 15px; background-color: #fdf2f2;">{}</blockquote>"#,
            escape_html(feedback)
        ),
        _ => String::new(),
    };

    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #1a7f64;">{subject}</h2>

                    <p>Hi {recipient},</p>

                    <p>{summary}</p>

                    {feedback}

                    <div style="text-align: center; margin: 30px 0;">
                        <a href="{url}"
                           style="background-color: #1a7f64; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; display: inline-block; font-weight: bold;">
                            View Project
                        </a>
                    </div>

                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

                    <p style="color: #666; font-size: 12px;">Thanks, The Lingodesk Team</p>
                </div>
            </body>
            </html>
            "#,
        subject = escape_html(&subject(email)),
        recipient = escape_html(email.recipient_name),
        summary = escape_html(&summary(email)),
        feedback = feedback,
        url = escape_html(email.project_url),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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
