//! Page chrome: theme resolution, nav highlighting and the inline widget
//! script that drives the menu, search overlay and scroll widgets.

use serde::Serialize;

/// Cookie holding the persisted theme preference.
pub const THEME_COOKIE: &str = "theme";

/// Client hint carrying the browser's colour-scheme preference. Browsers only
/// send it after a response lists it in `Accept-CH`.
pub const COLOR_SCHEME_HINT: &str = "Sec-CH-Prefers-Color-Scheme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    /// Stored preference wins, then the browser's colour-scheme hint, then
    /// the configured default.
    pub fn resolve(stored: Option<&str>, system_prefers_dark: bool, default: &str) -> Self {
        if let Some(theme) = stored.and_then(Theme::parse) {
            return theme;
        }
        if system_prefers_dark {
            return Theme::Dark;
        }
        Theme::parse(default).unwrap_or(Theme::Light)
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn html_class(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "",
        }
    }

    pub fn icon_classes(self) -> &'static str {
        match self {
            Theme::Dark => "fa-sun text-yellow-400",
            Theme::Light => "fa-moon",
        }
    }
}

/// Whether a nav link points at the page being viewed. The bare root and
/// `index.html` are the same page.
pub fn is_active_link(href: &str, current_path: &str) -> bool {
    let norm = |p: &str| -> String {
        let p = p.trim_end_matches('/');
        let p = p.strip_suffix("index.html").unwrap_or(p).trim_end_matches('/');
        let p = p.strip_suffix(".html").unwrap_or(p);
        if p.is_empty() { "/".to_string() } else { p.to_string() }
    };
    norm(href) == norm(current_path)
}

/// Browser side of the chrome: menu, search overlay with live results,
/// post overlay close keys, scroll progress, scroll-to-top, theme toggle and
/// fade-in sections.
pub fn widget_script() -> &'static str {
    r#"<script>
(function(){
var $=function(id){return document.getElementById(id)};
var menuToggle=$('menu-toggle'),mobileMenu=$('mobile-menu'),pageOverlay=$('page-overlay');
function closeMenu(){if(mobileMenu)mobileMenu.classList.add('hidden');if(pageOverlay)pageOverlay.classList.add('hidden');}
if(menuToggle&&mobileMenu){
menuToggle.addEventListener('click',function(){mobileMenu.classList.toggle('hidden');if(pageOverlay)pageOverlay.classList.toggle('hidden');});
if(pageOverlay)pageOverlay.addEventListener('click',closeMenu);
mobileMenu.querySelectorAll('a').forEach(function(a){a.addEventListener('click',closeMenu);});
}
var progress=$('scroll-progress'),topBtn=$('scroll-top-btn');
window.addEventListener('scroll',function(){
var el=document.documentElement,top=el.scrollTop||document.body.scrollTop,h=el.scrollHeight-el.clientHeight;
if(progress)progress.style.width=(h>0?Math.min(100,top/h*100):0)+'%';
if(topBtn)topBtn.classList.toggle('hidden',window.scrollY<=400);
});
if(topBtn)topBtn.addEventListener('click',function(){window.scrollTo({top:0,behavior:'smooth'});});
var modal=$('search-modal'),input=$('search-input'),form=$('search-form'),closeSearch=$('close-search-btn'),openSearch=$('search-open-btn');
var postModal=$('post-modal'),postContent=$('post-modal-content');
function hideSearch(){if(modal)modal.classList.add('hidden');}
function showSearch(){if(modal){modal.classList.remove('hidden');setTimeout(function(){if(input)input.focus();},80);}}
function closePost(){if(postModal){postModal.classList.add('hidden');if(postContent)postContent.innerHTML='';document.body.classList.remove('overflow-hidden');}}
document.addEventListener('keydown',function(e){
if(e.ctrlKey&&e.key.toLowerCase()==='s'){e.preventDefault();showSearch();}
if(e.key==='Escape'){hideSearch();closePost();}
});
if(openSearch)openSearch.addEventListener('click',showSearch);
if(closeSearch)closeSearch.addEventListener('click',hideSearch);
var listing=document.querySelector('[data-listing]'),searchSeq=0;
function runSearch(){
if(!form||!listing)return;
var q=input?input.value:'',seq=++searchSeq;
fetch(form.dataset.endpoint+'?q='+encodeURIComponent(q),{cache:'no-store'})
.then(function(r){return r.json()})
.then(function(j){
if(seq!==searchSeq)return;
var c=$(listing.dataset.listing),nr=$(listing.dataset.listing+'-no-results');
if(c)c.innerHTML=j.html;
if(nr)nr.classList.toggle('hidden',!j.empty);
})
.catch(function(){});
}
if(input)input.addEventListener('input',runSearch);
if(form&&listing)form.addEventListener('submit',function(e){e.preventDefault();runSearch();hideSearch();});
var theme=$('theme-toggle'),icon=$('theme-icon'),root=document.documentElement;
if(!/(?:^|;\s*)theme=/.test(document.cookie)&&window.matchMedia&&window.matchMedia('(prefers-color-scheme: dark)').matches){
root.classList.add('dark');if(icon)icon.className='fa fa-sun text-yellow-400';
}
if(theme)theme.addEventListener('click',function(){
var current=root.classList.contains('dark')?'dark':'light';
fetch('/api/theme?current='+current,{method:'POST'}).then(function(r){return r.json()}).then(function(j){
root.classList.toggle('dark',j.theme==='dark');
if(icon)icon.className='fa '+j.icon;
});
});
var fades=document.querySelectorAll('.fade-in-section');
if('IntersectionObserver' in window){
var obs=new IntersectionObserver(function(entries){entries.forEach(function(en){
if(en.isIntersecting){en.target.classList.add('opacity-100','translate-y-0');en.target.classList.remove('opacity-0','translate-y-6');obs.unobserve(en.target);}
});},{threshold:0.2});
fades.forEach(function(s){s.classList.add('opacity-0','translate-y-6','transition-all','duration-700');obs.observe(s);});
}
})();
</script>"#
}
