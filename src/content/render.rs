/// Converts cleaned HTML into Markdown text
pub trait Renderer: Send + Sync {
    fn render(&self, html: &str) -> String;
}

/// Renderer backed by the `html2md` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdRenderer;

impl Renderer for Html2MdRenderer {
    fn render(&self, html: &str) -> String {
        html2md::parse_html(html)
    }
}
