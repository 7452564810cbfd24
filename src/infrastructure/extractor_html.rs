use log::{debug, error};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{
    ExtractionError, ExtractionSchema, FieldRule, FieldSchema, GITHUB_WEB_ENDPOINT, Language,
    OwnerNamePair, PaginationCursor, Record, Showcase,
};

/// The rows of the trending listing.
pub const TRENDING_SCHEMA: ExtractionSchema = ExtractionSchema {
    name: "trending",
    root: "ol.repo-list > li",
    fields: &[FieldSchema {
        name: "href",
        rule: FieldRule::Attribute {
            selector: Some("h3 a"),
            attribute: "href",
        },
    }],
};

/// The entries of the language selection menu of the trending page.
pub const LANGUAGE_SCHEMA: ExtractionSchema = ExtractionSchema {
    name: "language",
    root: ".select-menu-list .select-menu-item",
    fields: &[
        FieldSchema {
            name: "name",
            rule: FieldRule::SubtreeText { selector: None },
        },
        FieldSchema {
            name: "href",
            rule: FieldRule::Attribute {
                selector: None,
                attribute: "href",
            },
        },
    ],
};

/// The collection blocks of the collections index.
pub const SHOWCASE_SCHEMA: ExtractionSchema = ExtractionSchema {
    name: "showcase",
    root: "article",
    fields: &[
        FieldSchema {
            name: "href",
            rule: FieldRule::Attribute {
                selector: Some("h3 a"),
                attribute: "href",
            },
        },
        FieldSchema {
            name: "name",
            rule: FieldRule::DirectText {
                selector: Some("h3 a"),
            },
        },
        FieldSchema {
            name: "image",
            rule: FieldRule::Attribute {
                selector: Some("img"),
                attribute: "src",
            },
        },
        FieldSchema {
            name: "description",
            rule: FieldRule::TextExcluding {
                selector: None,
                exclude: "h3",
            },
        },
    ],
};

/// The hidden field carrying the cursor of the next collections index page.
pub const SHOWCASE_CURSOR_SCHEMA: ExtractionSchema = ExtractionSchema {
    name: "showcase cursor",
    root: r#"input[type="hidden"][name="after"]"#,
    fields: &[FieldSchema {
        name: "after",
        rule: FieldRule::Attribute {
            selector: None,
            attribute: "value",
        },
    }],
};

/// The repository blocks of a collection detail page.
pub const SHOWCASE_REPOSITORY_SCHEMA: ExtractionSchema = ExtractionSchema {
    name: "showcase repository",
    root: "article",
    fields: &[FieldSchema {
        name: "href",
        rule: FieldRule::Attribute {
            selector: Some(".h3 a"),
            attribute: "href",
        },
    }],
};

enum CompiledRule {
    Attribute(&'static str),
    DirectText,
    SubtreeText,
    TextExcluding(Selector),
}

struct CompiledField {
    name: &'static str,
    selector: Option<(&'static str, Selector)>,
    rule: CompiledRule,
}

struct CompiledSchema {
    root: Selector,
    fields: Vec<CompiledField>,
}

impl CompiledSchema {
    fn try_new(schema: &ExtractionSchema) -> Result<Self, ExtractionError> {
        let fields = schema
            .fields
            .iter()
            .map(CompiledField::try_new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: parse_selector(schema.root)?,
            fields,
        })
    }
}

impl CompiledField {
    fn try_new(field: &FieldSchema) -> Result<Self, ExtractionError> {
        let rule = match field.rule {
            FieldRule::Attribute { attribute, .. } => CompiledRule::Attribute(attribute),
            FieldRule::DirectText { .. } => CompiledRule::DirectText,
            FieldRule::SubtreeText { .. } => CompiledRule::SubtreeText,
            FieldRule::TextExcluding { exclude, .. } => {
                CompiledRule::TextExcluding(parse_selector(exclude)?)
            }
        };
        let selector = match field.rule.selector() {
            Some(source) => Some((source, parse_selector(source)?)),
            None => None,
        };

        Ok(Self {
            name: field.name,
            selector,
            rule,
        })
    }
}

fn parse_selector(selector: &'static str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|_| ExtractionError::InvalidSelector(selector.to_string()))
}

/// Extracts typed records out of HTML documents.
///
/// Elements that do not satisfy a schema are dropped, the rest of the document is
/// still extracted.
pub struct HtmlExtractor;

impl HtmlExtractor {
    /// Extracts the raw records described by `schema`, in document order.
    pub fn extract(document: &str, schema: &ExtractionSchema) -> Vec<Record> {
        let document = Html::parse_document(document);

        Self::extract_with(&document, schema, |record| Ok(record.clone()))
    }

    /// Extracts the repositories listed on the trending page.
    pub fn trending_repositories(document: &str) -> Vec<OwnerNamePair> {
        let document = Html::parse_document(document);

        Self::extract_with(&document, &TRENDING_SCHEMA, |record| {
            owner_name_pair(record.get("href")?)
        })
    }

    /// Extracts the languages of the trending page menu.
    pub fn languages(document: &str) -> Vec<Language> {
        let document = Html::parse_document(document);

        Self::extract_with(&document, &LANGUAGE_SCHEMA, |record| {
            let slug = tail_segment(record.get("href")?)?;
            Ok(Language::new(record.get("name")?, &slug))
        })
    }

    /// Extracts the collections of an index page, with the cursor of the next page.
    pub fn showcases(document: &str) -> (Vec<Showcase>, Option<PaginationCursor>) {
        let document = Html::parse_document(document);
        let showcases = Self::extract_with(&document, &SHOWCASE_SCHEMA, |record| {
            Ok(Showcase {
                slug: tail_segment(record.get("href")?)?,
                name: record.get("name")?.to_string(),
                description: record.get("description")?.to_string(),
                image: record.get("image")?.to_string(),
            })
        });
        let cursor = Self::extract_with(&document, &SHOWCASE_CURSOR_SCHEMA, |record| {
            Ok(record.get("after")?.trim().to_string())
        })
        .into_iter()
        .find(|after| !after.is_empty())
        .map(PaginationCursor);

        (showcases, cursor)
    }

    /// Extracts the repositories listed on a collection detail page.
    pub fn showcase_repositories(document: &str) -> Vec<OwnerNamePair> {
        let document = Html::parse_document(document);

        Self::extract_with(&document, &SHOWCASE_REPOSITORY_SCHEMA, |record| {
            owner_name_pair(record.get("href")?)
        })
    }

    fn extract_with<T>(
        document: &Html,
        schema: &ExtractionSchema,
        convert: impl Fn(&Record) -> Result<T, ExtractionError>,
    ) -> Vec<T> {
        let compiled = match CompiledSchema::try_new(schema) {
            Ok(compiled) => compiled,
            Err(e) => {
                error!("Unusable `{}` extraction schema: {e}", schema.name);
                return vec![];
            }
        };

        document
            .select(&compiled.root)
            .filter_map(|root| {
                match read_record(root, &compiled).and_then(|record| convert(&record)) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        debug!("Skipping malformed `{}` record: {e}", schema.name);
                        None
                    }
                }
            })
            .collect()
    }
}

fn read_record(root: ElementRef, schema: &CompiledSchema) -> Result<Record, ExtractionError> {
    let mut record = Record::default();
    for field in &schema.fields {
        record.insert(field.name, read_field(root, field)?);
    }

    Ok(record)
}

fn read_field(root: ElementRef, field: &CompiledField) -> Result<String, ExtractionError> {
    let element = match &field.selector {
        Some((source, selector)) => select_first(root, field.name, *source, selector)?,
        None => root,
    };

    match &field.rule {
        CompiledRule::Attribute(attribute) => element
            .value()
            .attr(attribute)
            .map(str::to_string)
            .ok_or(ExtractionError::MissingAttribute {
                field: field.name,
                attribute: *attribute,
            }),
        CompiledRule::DirectText => Ok(direct_text(element)),
        CompiledRule::SubtreeText => Ok(subtree_text(element)),
        CompiledRule::TextExcluding(exclude) => Ok(text_excluding(element, exclude)),
    }
}

fn select_first<'a>(
    root: ElementRef<'a>,
    field: &'static str,
    source: &'static str,
    selector: &Selector,
) -> Result<ElementRef<'a>, ExtractionError> {
    let mut elements = root.select(selector);

    elements.next().ok_or(ExtractionError::MissingElement {
        field,
        selector: source,
    })
}

/// Collects the text nodes that are direct children of `element`.
fn direct_text(element: ElementRef) -> String {
    let text = element
        .children()
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .collect::<String>();

    collapse_whitespace(&text)
}

fn subtree_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collects the text of `element`, leaving out the subtrees matching `exclude`.
fn text_excluding(element: ElementRef, exclude: &Selector) -> String {
    let text = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let excluded = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != element.id())
                .filter_map(ElementRef::wrap)
                .any(|ancestor| exclude.matches(&ancestor));

            (!excluded).then_some(&**text)
        })
        .collect::<String>();

    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The non-empty path segments of a link, resolved against the website.
fn path_segments(href: &str) -> Result<Vec<String>, ExtractionError> {
    let url = Url::parse(GITHUB_WEB_ENDPOINT)
        .and_then(|base| base.join(href))
        .map_err(|_| ExtractionError::InvalidLink(href.to_string()))?;
    let segments = match url.path_segments() {
        Some(segments) => segments
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
        None => vec![],
    };

    Ok(segments)
}

/// Parses an `/owner/name[/...]` link.
fn owner_name_pair(href: &str) -> Result<OwnerNamePair, ExtractionError> {
    match path_segments(href)?.as_slice() {
        [owner, name, ..] => Ok(OwnerNamePair::new(owner, name)),
        _ => Err(ExtractionError::MissingSegment(href.to_string())),
    }
}

/// The percent-decoded last path segment of a link.
fn tail_segment(href: &str) -> Result<String, ExtractionError> {
    let segment = path_segments(href)?
        .pop()
        .ok_or_else(|| ExtractionError::MissingSegment(href.to_string()))?;

    Ok(urlencoding::decode(&segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRENDING_DOCUMENT: &str = r#"
        <div class="explore-content">
          <ol class="repo-list">
            <li id="pa-widget">
              <div class="d-inline-block col-9 mb-1">
                <h3><a href="/acme/widget">acme / widget</a></h3>
              </div>
            </li>
            <li id="pa-broken">
              <h3><a>missing link</a></h3>
            </li>
            <li id="pa-gadget">
              <h3><a href="/acme/gadget/tree/main">acme / gadget</a></h3>
            </li>
            <li id="pa-owner-only">
              <h3><a href="/acme">acme</a></h3>
            </li>
            <li id="pa-no-heading">
              <p>Sponsored</p>
            </li>
            <li id="pa-absolute">
              <h3><a href="https://github.com/globex/engine?tab=readme">globex / engine</a></h3>
            </li>
          </ol>
        </div>
    "#;

    const LANGUAGE_DOCUMENT: &str = r#"
        <div class="select-menu-list" data-filterable-for="text-filter-field">
          <a href="https://github.com/trending/c%23?since=daily" class="select-menu-item">
            <span class="select-menu-item-text">
              C#
            </span>
          </a>
          <a href="/trending/rust" class="select-menu-item">
            <span class="select-menu-item-text">Rust</span>
          </a>
          <div class="select-menu-item"><span>Unlinked</span></div>
          <a href="/trending/objective-c%2B%2B" class="select-menu-item">Objective-C++</a>
        </div>
    "#;

    fn showcase_document(cursor: Option<&str>) -> String {
        let cursor = cursor
            .map(|cursor| format!(r#"<input type="hidden" name="after" value="{cursor}">"#))
            .unwrap_or_default();

        format!(
            r#"
            <div class="collections">
              <article class="border-bottom">
                <a href="/collections/machine-learning">
                  <img src="https://example.com/ml.png" alt="">
                </a>
                <div class="summary">
                  <h3><a href="/collections/machine-learning">Machine learning</a></h3>
                  Laying the   foundations
                  for technologies.
                </div>
              </article>
              <article class="border-bottom">
                <div>
                  <h3><a href="/collections/no-image">No image</a></h3>Missing picture.
                </div>
              </article>
              <article class="border-bottom">
                <img src="https://example.com/games.png">
                <div>
                  <h3><a href="/collections/game-engines">Game engines</a></h3>
                  <p>Frameworks for <em>building</em> games.</p>
                </div>
              </article>
            </div>
            <form class="ajax-pagination-form" action="/collections" method="get">
              {cursor}
              <button type="submit">Load more</button>
            </form>
            "#
        )
    }

    const SHOWCASE_REPOSITORY_DOCUMENT: &str = r#"
        <article class="height-full border">
          <h1 class="h3 lh-condensed">
            <a href="/tensorflow/tensorflow">tensorflow / tensorflow</a>
          </h1>
        </article>
        <article class="height-full border">
          <h1 class="h3 lh-condensed"><a href="/orphan">orphan</a></h1>
        </article>
        <article class="height-full border">
          <p>Nothing to see</p>
        </article>
        <article class="height-full border">
          <h1 class="h3 lh-condensed">
            <a href="/scikit-learn/scikit-learn/">scikit-learn / scikit-learn</a>
          </h1>
        </article>
    "#;

    #[test]
    fn trending_repositories_skips_malformed_rows() {
        let pairs = HtmlExtractor::trending_repositories(TRENDING_DOCUMENT);

        assert_eq!(
            vec![
                OwnerNamePair::new("acme", "widget"),
                OwnerNamePair::new("acme", "gadget"),
                OwnerNamePair::new("globex", "engine"),
            ],
            pairs
        );
    }

    #[test]
    fn trending_repositories_resolve_links_against_website() {
        let document = r#"
            <ol class="repo-list">
              <li><h3><a href="//github.com/acme/widget">acme / widget</a></h3></li>
              <li><h3><a href="/acme//gadget">acme / gadget</a></h3></li>
              <li><h3><a href="globex/engine#readme">globex / engine</a></h3></li>
            </ol>
        "#;

        let pairs = HtmlExtractor::trending_repositories(document);

        assert_eq!(
            vec![
                OwnerNamePair::new("acme", "widget"),
                OwnerNamePair::new("acme", "gadget"),
                OwnerNamePair::new("globex", "engine"),
            ],
            pairs
        );
    }

    #[test]
    fn trending_repositories_of_empty_document() {
        assert!(HtmlExtractor::trending_repositories("<html></html>").is_empty());
    }

    #[test]
    fn languages_decode_slugs_and_trim_names() {
        let languages = HtmlExtractor::languages(LANGUAGE_DOCUMENT);

        assert_eq!(
            vec![
                Language::new("C#", "c#"),
                Language::new("Rust", "rust"),
                Language::new("Objective-C++", "objective-c++"),
            ],
            languages
        );
    }

    #[test]
    fn showcases_with_cursor() {
        let (showcases, cursor) = HtmlExtractor::showcases(&showcase_document(Some("abc")));

        assert_eq!(
            vec![
                Showcase {
                    slug: "machine-learning".to_string(),
                    name: "Machine learning".to_string(),
                    description: "Laying the foundations for technologies.".to_string(),
                    image: "https://example.com/ml.png".to_string(),
                },
                Showcase {
                    slug: "game-engines".to_string(),
                    name: "Game engines".to_string(),
                    description: "Frameworks for building games.".to_string(),
                    image: "https://example.com/games.png".to_string(),
                },
            ],
            showcases
        );
        assert_eq!(Some(PaginationCursor("abc".to_string())), cursor);
    }

    #[test]
    fn showcases_without_cursor() {
        let (showcases, cursor) = HtmlExtractor::showcases(&showcase_document(None));

        assert_eq!(2, showcases.len());
        assert_eq!(None, cursor);
    }

    #[test]
    fn showcases_with_empty_cursor() {
        let (_, cursor) = HtmlExtractor::showcases(&showcase_document(Some("  ")));

        assert_eq!(None, cursor);
    }

    #[test]
    fn showcase_description_excludes_nested_title() {
        let document = r#"
            <article>
              <img src="/x.png">
              <h3><a href="/collections/x">Repeated title</a></h3>
              <div>  Repeated title is not part of the text  <h3>Repeated title</h3>  </div>
            </article>
        "#;

        let (showcases, _) = HtmlExtractor::showcases(document);

        assert_eq!(
            "Repeated title is not part of the text",
            showcases[0].description
        );
    }

    #[test]
    fn showcase_name_ignores_nested_elements() {
        let document = r#"
            <article>
              <img src="/ml.png">
              <h3>
                <a href="/collections/machine-learning">
                  Machine   learning
                  <span class="Counter">12</span>
                </a>
              </h3>
              <p>Models.</p>
            </article>
        "#;

        let (showcases, _) = HtmlExtractor::showcases(document);

        assert_eq!("Machine learning", showcases[0].name);
        assert_eq!("Models.", showcases[0].description);
    }

    #[test]
    fn language_name_reads_nested_elements() {
        let document = r#"
            <div class="select-menu-list">
              <a href="/trending/go" class="select-menu-item"><span><b>Go</b></span></a>
            </div>
        "#;

        assert_eq!(
            vec![Language::new("Go", "go")],
            HtmlExtractor::languages(document)
        );
    }

    #[test]
    fn showcase_repositories_skip_incomplete_links() {
        let pairs = HtmlExtractor::showcase_repositories(SHOWCASE_REPOSITORY_DOCUMENT);

        assert_eq!(
            vec![
                OwnerNamePair::new("tensorflow", "tensorflow"),
                OwnerNamePair::new("scikit-learn", "scikit-learn"),
            ],
            pairs
        );
    }

    #[test]
    fn extract_raw_records() {
        let records = HtmlExtractor::extract(LANGUAGE_DOCUMENT, &LANGUAGE_SCHEMA);

        assert_eq!(3, records.len());
        assert_eq!(Ok("/trending/rust"), records[1].get("href"));
        assert_eq!(
            Err(ExtractionError::UnknownField("slug")),
            records[1].get("slug")
        );
    }

    #[test]
    fn extract_with_invalid_root_selector_yields_nothing() {
        let schema = ExtractionSchema {
            name: "broken",
            root: "li[",
            fields: &[],
        };

        assert!(HtmlExtractor::extract(TRENDING_DOCUMENT, &schema).is_empty());
    }

    #[test]
    fn owner_name_pair_requires_two_segments() {
        assert_eq!(
            Err(ExtractionError::MissingSegment("/acme".to_string())),
            owner_name_pair("/acme")
        );
        assert_eq!(
            Ok(OwnerNamePair::new("acme", "widget")),
            owner_name_pair("/acme/widget/tree/main")
        );
    }

    #[test]
    fn owner_name_pair_of_protocol_relative_link() {
        assert_eq!(
            Ok(OwnerNamePair::new("acme", "widget")),
            owner_name_pair("//github.com/acme/widget")
        );
    }

    #[test]
    fn owner_name_pair_skips_empty_segments() {
        assert_eq!(
            Ok(OwnerNamePair::new("acme", "widget")),
            owner_name_pair("/acme//widget")
        );
    }

    #[test]
    fn owner_name_pair_of_unresolvable_link() {
        assert_eq!(
            Err(ExtractionError::InvalidLink("https://[::1".to_string())),
            owner_name_pair("https://[::1")
        );
    }

    #[test]
    fn tail_segment_ignores_query_and_trailing_slash() {
        assert_eq!(
            Ok("c++".to_string()),
            tail_segment("https://github.com/trending/c%2B%2B/?since=weekly")
        );
        assert!(tail_segment("https://github.com").is_err());
    }
}
