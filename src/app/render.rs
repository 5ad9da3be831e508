use crate::core::query::{page_window, Page, PageMarker};
use crate::core::CatalogEntry;
use std::io::{self, Write};

const DESCRIPTION_WIDTH: usize = 140;

pub fn status_label(entry: &CatalogEntry) -> &'static str {
    if entry.is_published() {
        "Published"
    } else {
        "Not published"
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}…", head.trim_end())
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

pub fn render_card<W: Write>(out: &mut W, entry: &CatalogEntry) -> io::Result<()> {
    writeln!(
        out,
        "#{:<5} [{}] {}",
        entry.id_servicio, entry.subsystem_code, entry.member_class
    )?;
    writeln!(out, "       {}", entry.service_code)?;
    writeln!(out, "       {}", entry.member_name)?;
    if !entry.descripcion.trim().is_empty() {
        writeln!(out, "       {}", truncate(&entry.descripcion, DESCRIPTION_WIDTH))?;
    }
    writeln!(out, "       {} · {}", entry.service_type, status_label(entry))
}

pub fn render_page_window<W: Write>(out: &mut W, current: usize, total: usize) -> io::Result<()> {
    let parts: Vec<String> = page_window(current, total)
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if n == current => format!("[{}]", n),
            PageMarker::Page(n) => n.to_string(),
            PageMarker::Gap => "…".to_string(),
        })
        .collect();
    writeln!(out, "Pages: {}", parts.join(" "))
}

/// Header, cards of the current page and the pagination footer.
pub fn render_listing<W: Write>(
    out: &mut W,
    published: usize,
    page: &Page<'_, &CatalogEntry>,
) -> io::Result<()> {
    writeln!(out, "Service catalog")?;
    writeln!(
        out,
        "{} published services · {} results",
        published, page.total_items
    )?;
    writeln!(out)?;

    if page.total_items == 0 {
        writeln!(out, "No services found.")?;
        writeln!(
            out,
            "Try adjusting the search or member filter, or clear them to see every service."
        )?;
        return Ok(());
    }

    for entry in page.items {
        render_card(out, entry)?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "Showing {}-{} of {} services",
        page.first_shown, page.last_shown, page.total_items
    )?;
    if page.total_pages > 1 {
        render_page_window(out, page.number, page.total_pages)?;
    }
    Ok(())
}

pub fn render_detail<W: Write>(out: &mut W, entry: &CatalogEntry) -> io::Result<()> {
    writeln!(out, "{} ({})", entry.service_code, status_label(entry))?;
    writeln!(
        out,
        "{} · {} · v{}",
        entry.subsystem_code,
        entry.service_type,
        or_placeholder(&entry.service_version, "-")
    )?;
    writeln!(out)?;

    writeln!(out, "== General")?;
    writeln!(out, "{}", or_placeholder(&entry.descripcion, "No description."))?;
    writeln!(out, "Member:       {}", entry.member_name)?;
    writeln!(out, "Member code:  {}", entry.member_code)?;
    writeln!(out, "Member class: {}", entry.member_class)?;
    writeln!(out)?;

    writeln!(out, "== Access and documentation")?;
    if let Some(url) = entry.request_form_url() {
        writeln!(out, "Request form:  {}", url)?;
    }
    if let Some(url) = entry.documentation_url() {
        writeln!(out, "Documentation: {}", url)?;
    }
    match entry.attachment() {
        Some(attachment) => writeln!(out, "Attachment:    {}", attachment)?,
        None if entry.documentation_url().is_none() => {
            writeln!(out, "No attached documentation.")?
        }
        None => {}
    }
    writeln!(out)?;

    writeln!(out, "== Technical")?;
    writeln!(
        out,
        "Endpoint: {} {}",
        or_placeholder(&entry.endpoint_method, "-"),
        or_placeholder(
            &entry.endpoint_path,
            "Not defined in metadata. See the documentation."
        )
    )?;
    writeln!(out, "Parameters:")?;
    writeln!(out, "{}", or_placeholder(&entry.parametros, "(none)"))?;
    writeln!(out)?;

    writeln!(out, "== Response example")?;
    writeln!(out, "{}", or_placeholder(&entry.respuesta, "(none)"))?;
    writeln!(out)?;

    writeln!(
        out,
        "X-Road instance: {} · Responsible: {}",
        entry.x_road_instance, entry.responsables
    )
}
