use crate::{config::Sentinels, deadline::looks_like_deadline, Extraction, Extractor, RawContest};
use itertools::Itertools;
use lazy_regex::regex;
use lazy_static::lazy_static;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

const E: &str = "Invalid selector";
lazy_static! {
    static ref ITEM: Selector = Selector::parse("div.activity-list-card-item-wrapper").expect(E);
    static ref ANCHOR: Selector = Selector::parse("a.image-link").expect(E);
    static ref TITLE: Selector = Selector::parse("h5.activity-title").expect(E);
    static ref HOST: Selector = Selector::parse("p.organization-name").expect(E);
    static ref CLASSED_DIV: Selector = Selector::parse("div[class]").expect(E);
}

#[derive(Debug)]
pub struct LinkareerExtractor {
    origin: Url,
    sentinels: Sentinels,
}

impl LinkareerExtractor {
    pub fn new(origin: Url, sentinels: Sentinels) -> Self {
        LinkareerExtractor { origin, sentinels }
    }

    pub fn extract_str(&self, markup: &str) -> Extraction<RawContest> {
        let doc = Html::parse_document(markup);
        self.extract(&doc)
    }

    fn extract_item(&self, item: ElementRef) -> RawContest {
        let (title, link) = self.extract_title_and_link(item);

        let host = item
            .select(&HOST)
            .next()
            .map(text_of)
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| self.sentinels.no_host.clone());

        let deadline_text = locate_deadline_label(item)
            .map(text_of)
            .unwrap_or_else(|| self.sentinels.no_deadline.clone());

        RawContest {
            title,
            link,
            host,
            deadline_text,
        }
    }

    /// Title and absolute link. A missing anchor or title gives the title
    /// sentinel; an unusable `href` keeps the title with an empty link.
    fn extract_title_and_link(&self, item: ElementRef) -> (String, String) {
        let untitled = || (self.sentinels.no_title.clone(), String::new());

        let Some(anchor) = item.select(&ANCHOR).next() else {
            return untitled();
        };
        let Some(title) = item.select(&TITLE).next().map(text_of).filter(|t| !t.is_empty()) else {
            return untitled();
        };

        let Some(href) = anchor.value().attr("href").map(str::trim).filter(|h| !h.is_empty())
        else {
            warn!("Contest {:?} has no link", title);
            return (title, String::new());
        };

        let link = self.resolve_link(href).unwrap_or_else(|| {
            warn!("Contest {:?} has an unusable link {:?}", title, href);
            String::new()
        });
        (title, link)
    }

    fn resolve_link(&self, href: &str) -> Option<String> {
        self.origin.join(href).ok().map(String::from)
    }
}

impl Extractor for LinkareerExtractor {
    type Record = RawContest;

    fn extract(&self, doc: &Html) -> Extraction<Self::Record> {
        let contests = doc
            .select(&ITEM)
            .map(|item| self.extract_item(item))
            .collect_vec();

        if contests.is_empty() {
            warn!("No contest items found");
            return Extraction::Empty;
        }

        debug!("Extracted {} contest items", contests.len());
        Extraction::Items(contests)
    }
}

/// The label wrapper's class carries a build-generated suffix, so it is matched
/// by pattern. Inside it, the label is the first element that reads like a
/// deadline, narrowed to its innermost matching child.
fn locate_deadline_label(item: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let wrapper = item.select(&CLASSED_DIV).find(|el| {
        el.value()
            .attr("class")
            .map_or(false, |c| regex!(r"SecondInfoText__StyledWrapper").is_match(c))
    })?;

    let is_label = |el: &ElementRef| looks_like_deadline(&text_of(*el));

    let mut label = wrapper
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(is_label)?;
    while let Some(inner) = label.children().filter_map(ElementRef::wrap).find(is_label) {
        label = inner;
    }
    Some(label)
}

fn text_of(el: ElementRef) -> String {
    let text = el.text().collect::<String>();
    regex!(r"\s+").replace_all(text.trim(), " ").into_owned()
}
