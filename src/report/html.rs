use crate::core::error::IndexError;
use crate::core::model::{Href, IndexPage, Section};
use std::fmt::Write as FmtWrite;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WEBSITE: &str = env!("CARGO_PKG_REPOSITORY");

pub const DEFAULT_LOGO: &str = "logo.png";

#[derive(Clone, Debug)]
pub struct HtmlOptions {
    /// `src` of the banner image.
    pub logo: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        HtmlOptions {
            logo: DEFAULT_LOGO.to_string(),
        }
    }
}

pub fn render_page(page: &IndexPage, opts: &HtmlOptions) -> Result<String, IndexError> {
    let run_id = escape_html(page.run_id.as_str());
    let mut html = String::with_capacity(4 * 1024);

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(html, "<title>Run {}</title>", run_id)?;
    writeln!(html, "<style>")?;
    writeln!(html, "body{{font-family:sans-serif;margin:40px;}}")?;
    writeln!(html, "img{{width:6%;}}")?;
    writeln!(html, ".meta{{color:#555;font-size:13px;margin-top:24px;}}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;

    writeln!(html, "<div id=\"banner\">")?;
    writeln!(html, "<h1>")?;
    writeln!(
        html,
        "<img src=\"{}\" alt=\"logo\"/>",
        escape_html(&opts.logo)
    )?;
    writeln!(html, "<center>Run {} reports</center>", run_id)?;
    writeln!(html, "</h1>")?;
    writeln!(html, "</div>")?;

    for section in &page.sections {
        write_section(&mut html, section)?;
    }

    writeln!(
        html,
        "<div class=\"meta\">Produced by {} {}</div>",
        APP_NAME, VERSION
    )?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

fn write_section(out: &mut String, section: &Section) -> Result<(), IndexError> {
    writeln!(out, "<h2>{}</h2>", section.kind.title())?;
    writeln!(out, "<ul>")?;
    for link in &section.links {
        writeln!(
            out,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&encode_href(&link.href)),
            escape_html(link.label)
        )?;
    }
    writeln!(out, "</ul>")?;
    Ok(())
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn encode_href(href: &Href) -> String {
    href.segments
        .iter()
        .map(|s| encode_segment(s))
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn encode_segment(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0f) as usize] as char);
        }
    }
    out
}

/// Inverse of `escape_html(encode_href(..))`, giving back the relative path.
pub fn decode_href(s: &str) -> String {
    let s = s
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
