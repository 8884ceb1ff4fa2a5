use crate::designs::journal::id_attr;
use crate::models::entity::Entity;
use crate::models::search::CategoryFilter;
use crate::render::{format_date, html_escape, truncate_chars, url_encode, CardContext, RenderOptions};

pub const EXPAND_LABEL: &str = "Read More ↓";
pub const COLLAPSE_LABEL: &str = "Show Less ↑";

/// Labs listing card. The body is either the truncated teaser or, for the
/// expanded card, the full description with video and "View Full Lab" link.
pub fn card(lab: &Entity, index: usize, opts: &RenderOptions, ctx: &CardContext) -> String {
    let expanded = ctx.expanded == Some(index);
    let title = html_escape(&lab.title);
    let (content, content_class) = if expanded {
        (detail_body(lab), " expanded")
    } else {
        (
            html_escape(&truncate_chars(lab.card_text(), opts.truncate_length)),
            "",
        )
    };
    // Collapsed cards still show the video below the teaser; the expanded body
    // carries its own player.
    let video = if expanded {
        String::new()
    } else {
        lab.video.as_deref().map(video_embed).unwrap_or_default()
    };
    let toggle_href = ctx.detail_href(if expanded { None } else { Some(index) });

    format!(
        "<div class=\"content-card lab-card bg-gray-900 rounded-xl shadow-lg overflow-hidden border border-gray-800 transition-transform duration-300\" \
         data-category=\"{category}\" data-index=\"{index}\"{id_attr}>\
         <img src=\"{image}\" alt=\"{title}\" class=\"w-full h-48 object-cover\">\
         <div class=\"p-6\">\
         <h3 class=\"text-xl font-semibold text-green-500 mb-2\">{title}</h3>\
         <p class=\"text-gray-400 text-sm mb-3\">{meta}</p>\
         <div class=\"text-gray-300 text-sm mb-4 read-more-content{content_class}\">{content}</div>\
         {video}\
         <div class=\"flex justify-between items-center mt-4\">\
         <a class=\"read-more-btn text-green-400 hover:text-green-500 text-sm font-medium\" href=\"{toggle_href}\" \
         data-index=\"{index}\" aria-expanded=\"{expanded}\">{label}</a>\
         </div>\
         </div>\
         </div>",
        category = html_escape(lab.category.as_deref().unwrap_or("")),
        index = index,
        id_attr = id_attr(lab),
        image = html_escape(&lab.image),
        title = title,
        meta = meta_line(lab, ctx),
        content_class = content_class,
        content = content,
        video = video,
        toggle_href = html_escape(&toggle_href),
        expanded = expanded,
        label = if expanded { COLLAPSE_LABEL } else { EXPAND_LABEL },
    )
}

/// Home page card: category line and a link to the lab on the labs page.
pub fn preview_card(lab: &Entity, opts: &RenderOptions, _ctx: &CardContext) -> String {
    let href = match &lab.id {
        Some(id) => format!("/labs?id={}", url_encode(id)),
        None => "/labs".to_string(),
    };
    let title = html_escape(&lab.title);
    format!(
        "<article class=\"content-card lab-preview bg-gray-800 p-6 rounded-2xl border border-gray-700 shadow transition-all duration-300 transform hover:-translate-y-2\">\
         <div class=\"w-full h-44 overflow-hidden rounded-lg mb-4\">\
         <img src=\"{image}\" alt=\"{title}\" class=\"w-full h-full object-cover\">\
         </div>\
         <h3 class=\"text-xl font-semibold text-white mb-2\">{title}</h3>\
         <p class=\"text-green-500 text-sm mb-2\">{category}</p>\
         <p class=\"text-gray-400 mb-4\">{text}</p>\
         <a href=\"{href}\" class=\"inline-block mt-2 text-green-500 hover:text-green-400 font-medium\">View Lab →</a>\
         </article>",
        image = html_escape(&lab.image),
        title = title,
        category = html_escape(lab.category.as_deref().unwrap_or("")),
        text = html_escape(&truncate_chars(lab.card_text(), opts.truncate_length)),
        href = html_escape(&href),
    )
}

/// Full in-place body of an expanded lab card.
pub fn detail_body(lab: &Entity) -> String {
    let mut html = format!("<p>{}</p>", html_escape(&lab.body));
    if let Some(video) = &lab.video {
        html.push_str(&video_embed(video));
    }
    if let Some(link) = &lab.link {
        html.push_str(&format!(
            "<div class=\"mt-4\"><a href=\"{}\" class=\"text-green-400 hover:text-green-500 font-medium\">View Full Lab →</a></div>",
            html_escape(link)
        ));
    }
    html
}

fn video_embed(src: &str) -> String {
    format!(
        "<div class=\"mt-4 rounded-xl overflow-hidden\">\
         <iframe class=\"w-full aspect-video rounded-lg\" src=\"{}\" frameborder=\"0\" allowfullscreen></iframe>\
         </div>",
        html_escape(src)
    )
}

fn meta_line(lab: &Entity, ctx: &CardContext) -> String {
    let date = html_escape(&format_date(lab, ctx.settings));
    match &lab.category {
        Some(cat) => format!("{} • {}", date, html_escape(cat)),
        None => date,
    }
}

/// Inline category buttons. The active one is highlighted.
pub fn category_buttons(categories: &[String], active: &CategoryFilter) -> String {
    let mut values = vec![CategoryFilter::All];
    values.extend(categories.iter().map(|c| CategoryFilter::Named(c.clone())));

    let buttons: String = values
        .iter()
        .map(|value| {
            let is_active = match (value, active) {
                (CategoryFilter::All, CategoryFilter::All) => true,
                (CategoryFilter::Named(a), CategoryFilter::Named(b)) => a.eq_ignore_ascii_case(b),
                _ => false,
            };
            let label = match value {
                CategoryFilter::All => "All".to_string(),
                CategoryFilter::Named(name) => name.clone(),
            };
            format!(
                "<a href=\"/labs?category={query}\" class=\"filter-btn px-4 py-2 rounded border border-green-600{active}\" data-category=\"{value}\">{label}</a>",
                query = url_encode(value.value()),
                active = if is_active { " bg-green-600 text-white" } else { "" },
                value = html_escape(value.value()),
                label = html_escape(&label),
            )
        })
        .collect();
    format!("<div id=\"lab-filters\" class=\"flex flex-wrap gap-3 justify-center mb-10\">{}</div>", buttons)
}
