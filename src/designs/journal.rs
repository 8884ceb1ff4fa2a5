use crate::models::entity::Entity;
use crate::models::settings::SiteSettings;
use crate::render::{format_date, html_escape, truncate_chars, url_encode, CardContext, RenderOptions};

/// Blog listing card. "Read More" opens the post overlay when the post has a
/// body to show, and falls back to the post's external link otherwise.
pub fn card(post: &Entity, index: usize, opts: &RenderOptions, ctx: &CardContext) -> String {
    let title = html_escape(&post.title);
    let button = if post.has_detail() {
        format!(
            "<a class=\"read-more-btn bg-green-600 hover:bg-green-500 text-white px-4 py-2 rounded transition\" \
             href=\"{}\" data-index=\"{}\">Read More →</a>",
            html_escape(&ctx.detail_href(Some(index))),
            index
        )
    } else if let Some(link) = &post.link {
        format!(
            "<a class=\"read-more-btn bg-green-600 hover:bg-green-500 text-white px-4 py-2 rounded transition\" \
             href=\"{link}\" data-link=\"{link}\">Read More →</a>",
            link = html_escape(link)
        )
    } else {
        String::new()
    };

    format!(
        "<article class=\"content-card blog-card bg-gray-900 border border-gray-800 rounded-xl shadow hover:shadow-lg transition duration-300 overflow-hidden\" \
         data-index=\"{index}\"{id_attr}>\
         <img src=\"{image}\" alt=\"{title}\" class=\"w-full h-56 object-cover\">\
         <div class=\"p-6\">\
         <h3 class=\"text-xl font-bold mb-2 text-green-500\">{title}</h3>\
         <p class=\"text-gray-400 text-sm mb-4\">{date}</p>\
         <p class=\"text-gray-300 mb-6\">{text}</p>\
         {button}\
         </div>\
         </article>",
        index = index,
        id_attr = id_attr(post),
        image = html_escape(&post.image),
        title = title,
        date = html_escape(&format_date(post, ctx.settings)),
        text = html_escape(&truncate_chars(post.card_text(), opts.truncate_length)),
        button = button,
    )
}

/// Home page card linking to the post's deep link on the blog page.
pub fn preview_card(post: &Entity, opts: &RenderOptions, ctx: &CardContext) -> String {
    let href = match &post.id {
        Some(id) => format!("/blog?id={}", url_encode(id)),
        None => "/blog".to_string(),
    };
    let title = html_escape(&post.title);
    format!(
        "<article class=\"content-card blog-preview bg-gray-900 p-6 rounded-2xl border border-gray-800 shadow-md transition-all duration-300 transform hover:-translate-y-2\">\
         <div class=\"w-full h-44 overflow-hidden rounded-lg mb-4\">\
         <img src=\"{image}\" alt=\"{title}\" class=\"w-full h-full object-cover\">\
         </div>\
         <h3 class=\"text-xl font-semibold text-white mb-2\">{title}</h3>\
         <p class=\"text-gray-400 text-sm mb-3\">{date}</p>\
         <p class=\"text-gray-300 mb-4\">{text}</p>\
         <a href=\"{href}\" class=\"text-green-500 hover:text-green-400 font-medium\">Read More →</a>\
         </article>",
        image = html_escape(&post.image),
        title = title,
        date = html_escape(&format_date(post, ctx.settings)),
        text = html_escape(&truncate_chars(post.card_text(), opts.truncate_length)),
        href = html_escape(&href),
    )
}

/// Full post for the overlay's content slot. Blank lines in the body start a
/// new paragraph.
pub fn overlay(post: &Entity, settings: &SiteSettings) -> String {
    let title = html_escape(&post.title);
    let paragraphs: String = post
        .body
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p class=\"mb-4\">{}</p>", html_escape(p)))
        .collect();
    let link = post
        .link
        .as_ref()
        .map(|l| {
            format!(
                "<a href=\"{}\" class=\"text-green-500 hover:text-green-400 font-medium\">Open full article →</a>",
                html_escape(l)
            )
        })
        .unwrap_or_default();

    format!(
        "<article class=\"post-detail\"{id_attr}>\
         <img src=\"{image}\" alt=\"{title}\" class=\"w-full rounded-xl mb-6\">\
         <h2 class=\"text-3xl font-bold text-green-500 mb-2\">{title}</h2>\
         <p class=\"text-gray-400 text-sm mb-6\">{date}</p>\
         <div class=\"post-body text-gray-200\">{paragraphs}</div>\
         {link}\
         </article>",
        id_attr = id_attr(post),
        image = html_escape(&post.image),
        title = title,
        date = html_escape(&format_date(post, settings)),
        paragraphs = paragraphs,
        link = link,
    )
}

pub(crate) fn id_attr(entity: &Entity) -> String {
    entity
        .id
        .as_ref()
        .map(|id| format!(" data-id=\"{}\"", html_escape(id)))
        .unwrap_or_default()
}
