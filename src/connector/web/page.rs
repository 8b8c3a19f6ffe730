use crate::domain::{ChatModel, Message};

/// One-shot message shown above the transcript after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn css_class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "notice success",
            Notice::Warning(_) => "notice warning",
            Notice::Error(_) => "notice error",
        }
    }

    fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Warning(text) | Notice::Error(text) => text,
        }
    }
}

/// Everything the chat page shows for one session.
pub struct PageView<'a> {
    pub title: &'a str,
    pub model: ChatModel,
    pub transcript: Vec<&'a Message>,
    /// Persistent configuration warning (missing API key).
    pub banner: Option<&'a str>,
    /// Notices from the last action, shown in order.
    pub notices: &'a [Notice],
}

const STYLE: &str = "\
body{font-family:sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:1rem;font-weight:bold}\
input,select,textarea{width:100%;box-sizing:border-box;padding:.4rem}\
textarea{min-height:6rem}\
.actions{margin-top:1rem;display:flex;gap:.5rem}\
.notice,.banner{padding:.6rem;margin:1rem 0;border-radius:4px}\
.banner,.warning{background:#fff3cd}.success{background:#d1e7dd}.error{background:#f8d7da}\
.turn{margin:.6rem 0;white-space:pre-wrap}";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn render_page(view: &PageView<'_>) -> String {
    let title = escape_html(view.title);
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n"));

    if let Some(banner) = view.banner {
        html.push_str(&format!(
            "<div class=\"banner\" role=\"alert\">{}</div>\n",
            escape_html(banner)
        ));
    }

    html.push_str("<form method=\"post\" action=\"/send\">\n");
    html.push_str(&format!(
        "<label for=\"app_name\">Enter your application name:</label>\n\
         <input id=\"app_name\" name=\"app_name\" type=\"text\" value=\"{title}\">\n"
    ));

    html.push_str("<label for=\"model\">Choose AI Model</label>\n<select id=\"model\" name=\"model\">\n");
    for model in ChatModel::ALL {
        let selected = if model == view.model { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{id}\"{selected}>{id}</option>\n",
            id = model.as_str()
        ));
    }
    html.push_str("</select>\n");

    html.push_str(
        "<label for=\"message\">Your Message</label>\n\
         <textarea id=\"message\" name=\"message\" placeholder=\"Ask something...\"></textarea>\n\
         <div class=\"actions\">\n\
         <button type=\"submit\">Send</button>\n\
         <button type=\"submit\" formaction=\"/clear\">Clear Chat</button>\n\
         </div>\n</form>\n",
    );

    for notice in view.notices {
        html.push_str(&format!(
            "<div class=\"{}\">{}</div>\n",
            notice.css_class(),
            escape_html(notice.text())
        ));
    }

    html.push_str("<section id=\"transcript\">\n");
    for message in &view.transcript {
        html.push_str(&format!(
            "<div class=\"turn {}\"><strong>{}</strong>: {}</div>\n",
            message.role().as_str(),
            message.role().label(),
            escape_html(message.content())
        ));
    }
    html.push_str("</section>\n</body>\n</html>\n");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(transcript: Vec<&'a Message>, notices: &'a [Notice]) -> PageView<'a> {
        PageView {
            title: "Groq AI Chatbot",
            model: ChatModel::Mixtral8x7b,
            transcript,
            banner: None,
            notices,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn renders_controls_and_selected_model() {
        let html = render_page(&view(vec![], &[]));
        assert!(html.contains("<title>Groq AI Chatbot</title>"));
        assert!(html.contains("<option value=\"mixtral-8x7b\" selected>"));
        assert!(html.contains("<option value=\"llama3-8b-8192\">"));
        assert!(html.contains(">Send</button>"));
        assert!(html.contains(">Clear Chat</button>"));
    }

    #[test]
    fn renders_transcript_in_order_with_labels() {
        let user = Message::user("hi <there>");
        let assistant = Message::assistant("hello");
        let html = render_page(&view(vec![&user, &assistant], &[]));

        let user_at = html.find("<strong>User</strong>: hi &lt;there&gt;").unwrap();
        let assistant_at = html.find("<strong>Assistant</strong>: hello").unwrap();
        assert!(user_at < assistant_at);
    }

    #[test]
    fn renders_banner_and_notice() {
        let notices = [Notice::Error("Error: 401, unauthorized".to_string())];
        let mut page = view(vec![], &notices);
        page.banner = Some("GROQ_API_KEY is not set.");
        let html = render_page(&page);

        assert!(html.contains("<div class=\"banner\" role=\"alert\">GROQ_API_KEY is not set.</div>"));
        assert!(html.contains("<div class=\"notice error\">Error: 401, unauthorized</div>"));
    }

    #[test]
    fn renders_every_notice_in_order() {
        let notices = [
            Notice::Warning("unknown model 'gpt-4'".to_string()),
            Notice::Success("Chat history cleared.".to_string()),
        ];
        let html = render_page(&view(vec![], &notices));

        let warning_at = html
            .find("<div class=\"notice warning\">unknown model &#39;gpt-4&#39;</div>")
            .unwrap();
        let success_at = html
            .find("<div class=\"notice success\">Chat history cleared.</div>")
            .unwrap();
        assert!(warning_at < success_at);
    }
}
