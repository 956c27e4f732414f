//! Post template dispatch and rendering.
//!
//! [`PostTemplateFactory`] maps a post's declared type to one of six
//! templates and renders it with [maud](https://maud.lambda.xyz/). Rendering
//! is total: an unrecognized type falls back to the article template, and a
//! payload that does not match its declared type renders as that type's
//! empty default. Both cases log a warning.
//!
//! Article section bodies are markdown and go through pulldown-cmark; all
//! other text is escaped by maud.

use crate::post::{
    ArticleContent, CaseStudyContent, InfographicContent, Post, PostContent, PostType,
    PostTypeTag, SectionKind, SlideContent, SlideKind, TutorialContent, VideoContent,
};
use crate::types::Locale;
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

/// UI strings that templates print around content.
struct Labels {
    min_read: &'static str,
    by: &'static str,
    challenge: &'static str,
    solution: &'static str,
    implementation: &'static str,
    results: &'static str,
    download: &'static str,
    chapters: &'static str,
    transcript: &'static str,
    prerequisites: &'static str,
    estimated_time: &'static str,
    tips: &'static str,
}

const EN: Labels = Labels {
    min_read: "min read",
    by: "By",
    challenge: "The Challenge",
    solution: "Our Solution",
    implementation: "Implementation",
    results: "Results",
    download: "Download",
    chapters: "Chapters",
    transcript: "Transcript",
    prerequisites: "Prerequisites",
    estimated_time: "Estimated time",
    tips: "Tips",
};

const HU: Labels = Labels {
    min_read: "perc olvasás",
    by: "Szerző:",
    challenge: "A kihívás",
    solution: "Megoldásunk",
    implementation: "Megvalósítás",
    results: "Eredmények",
    download: "Letöltés",
    chapters: "Fejezetek",
    transcript: "Átirat",
    prerequisites: "Előfeltételek",
    estimated_time: "Becsült idő",
    tips: "Tippek",
};

const DE: Labels = Labels {
    min_read: "Min. Lesezeit",
    by: "Von",
    challenge: "Die Herausforderung",
    solution: "Unsere Lösung",
    implementation: "Umsetzung",
    results: "Ergebnisse",
    download: "Herunterladen",
    chapters: "Kapitel",
    transcript: "Transkript",
    prerequisites: "Voraussetzungen",
    estimated_time: "Geschätzte Zeit",
    tips: "Tipps",
};

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::En => &EN,
        Locale::Hu => &HU,
        Locale::De => &DE,
    }
}

/// Selects and renders the template for a post.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostTemplateFactory {
    locale: Locale,
}

impl PostTemplateFactory {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// The template for a declared type. Unknown types get the article
    /// template.
    pub fn select_template(&self, tag: &PostTypeTag) -> PostType {
        match tag {
            PostTypeTag::Known(t) => *t,
            PostTypeTag::Unknown(name) => {
                tracing::warn!(post_type = %name, "unknown post type, using article template");
                PostType::Article
            }
        }
    }

    /// Render a post's body: header plus the selected template.
    pub fn render(&self, post: &Post) -> Markup {
        let template = self.select_template(&post.post_type);
        let content = PostContent::narrow(template, &post.content).unwrap_or_else(|e| {
            tracing::warn!(
                slug = %post.slug,
                template = %template,
                error = %e,
                "post content does not match its template, rendering empty"
            );
            empty_content(template)
        });
        let l = labels(self.locale);

        html! {
            article.post data-template=(template.as_str()) {
                (post_header(post, l))
                @match &content {
                    PostContent::Article(c) => { (article(c)) }
                    PostContent::Slideshow(slides) => { (slideshow(slides)) }
                    PostContent::CaseStudy(c) => { (case_study(c, l)) }
                    PostContent::Infographic(c) => { (infographic(c, l)) }
                    PostContent::Video(c) => { (video(c, l)) }
                    PostContent::Tutorial(c) => { (tutorial(c, l)) }
                }
            }
        }
    }
}

fn empty_content(post_type: PostType) -> PostContent {
    match post_type {
        PostType::Article => PostContent::Article(Default::default()),
        PostType::Slideshow => PostContent::Slideshow(Vec::new()),
        PostType::CaseStudy => PostContent::CaseStudy(Default::default()),
        PostType::Infographic => PostContent::Infographic(Default::default()),
        PostType::Video => PostContent::Video(Default::default()),
        PostType::Tutorial => PostContent::Tutorial(Default::default()),
    }
}

/// Markdown to trusted HTML.
pub fn markdown(text: &str) -> Markup {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(text));
    PreEscaped(out)
}

fn post_header(post: &Post, l: &Labels) -> Markup {
    html! {
        header.post-header {
            @if let Some(image) = &post.image {
                img.post-hero src=(image) alt=(post.title);
            }
            h1 { (post.title) }
            @if let Some(summary) = &post.summary {
                p.post-summary { (summary) }
            }
            p.post-meta {
                @if let Some(author) = &post.author {
                    span.post-author {
                        (l.by) " " (author.name)
                        @if let Some(role) = &author.role {
                            ", " (role)
                        }
                    }
                }
                @if let Some(date) = &post.date {
                    " · " time datetime=(date) { (date) }
                }
                @if let Some(minutes) = post.read_time {
                    " · " span.read-time { (minutes) " " (l.min_read) }
                }
            }
            @if !post.tags.is_empty() {
                ul.post-tags {
                    @for tag in &post.tags {
                        li { (tag) }
                    }
                }
            }
        }
    }
}

fn article(c: &ArticleContent) -> Markup {
    html! {
        div.article-body {
            @if let Some(intro) = &c.introduction {
                p.lead { (intro) }
            }
            @for section in &c.sections {
                @let kind = section.kind.unwrap_or(SectionKind::Text);
                section class={ "section section-" (section_class(kind)) } {
                    h2 { (section.title) }
                    @if let Some(image) = &section.image {
                        img src=(image) alt=(section.title) loading="lazy";
                    }
                    @if kind == SectionKind::Quote {
                        blockquote { (markdown(&section.content)) }
                    } @else {
                        (markdown(&section.content))
                    }
                }
            }
            @if let Some(conclusion) = &c.conclusion {
                p.conclusion { (conclusion) }
            }
        }
    }
}

fn section_class(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Text => "text",
        SectionKind::ImageText => "image-text",
        SectionKind::Quote => "quote",
        SectionKind::List => "list",
    }
}

fn slideshow(slides: &[SlideContent]) -> Markup {
    html! {
        div.slideshow {
            @for (i, slide) in slides.iter().enumerate() {
                @let kind = match slide.kind {
                    Some(SlideKind::Intro) => "intro",
                    Some(SlideKind::Conclusion) => "conclusion",
                    _ => "content",
                };
                figure class={ "slide slide-" (kind) } data-index=(i) {
                    img src=(slide.image) alt=(slide.alt) loading=(if i == 0 { "eager" } else { "lazy" });
                    figcaption {
                        @if let Some(title) = &slide.title {
                            h2 { (title) }
                        }
                        p { (slide.text) }
                    }
                }
            }
        }
    }
}

fn case_study(c: &CaseStudyContent, l: &Labels) -> Markup {
    html! {
        div.case-study {
            @if !c.client.name.is_empty() {
                p.client {
                    strong { (c.client.name) }
                    @if !c.client.industry.is_empty() {
                        " · " (c.client.industry)
                    }
                }
            }
            section.challenge {
                h2 { (l.challenge) }
                p { (c.challenge) }
            }
            section.solution {
                h2 { (l.solution) }
                p { (c.solution) }
            }
            @if !c.implementation.is_empty() {
                section.implementation {
                    h2 { (l.implementation) }
                    ol {
                        @for step in &c.implementation {
                            li { (step) }
                        }
                    }
                }
            }
            @if !c.results.is_empty() {
                section.results {
                    h2 { (l.results) }
                    dl.metrics {
                        @for metric in &c.results {
                            div.metric {
                                dt { (metric.label) }
                                dd {
                                    (metric.value)
                                    @if let Some(improvement) = &metric.improvement {
                                        " " span.improvement { "(" (improvement) ")" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            @if let Some(t) = &c.testimonial {
                blockquote.testimonial {
                    p { (t.quote) }
                    footer { (t.author) ", " (t.position) }
                }
            }
            @if !c.technologies.is_empty() {
                ul.technologies {
                    @for tech in &c.technologies {
                        li { (tech) }
                    }
                }
            }
        }
    }
}

fn infographic(c: &InfographicContent, l: &Labels) -> Markup {
    html! {
        div.infographic {
            @if !c.infographic_url.is_empty() {
                img.infographic-image src=(c.infographic_url) alt="" loading="lazy";
            }
            @for section in &c.sections {
                section {
                    h2 { (section.title) }
                    p { (section.description) }
                }
            }
            @if let Some(url) = &c.download_url {
                a.download href=(url) download { (l.download) }
            }
        }
    }
}

fn video(c: &VideoContent, l: &Labels) -> Markup {
    html! {
        div.video {
            video controls preload="metadata" src=(c.video_url) poster=[c.thumbnail.as_deref()] {}
            @if !c.chapters.is_empty() {
                section.chapters {
                    h2 { (l.chapters) }
                    ol {
                        @for chapter in &c.chapters {
                            li {
                                span.timestamp { (chapter.timestamp) }
                                " " strong { (chapter.title) }
                                @if !chapter.description.is_empty() {
                                    p { (chapter.description) }
                                }
                            }
                        }
                    }
                }
            }
            @if let Some(transcript) = &c.transcript {
                details.transcript {
                    summary { (l.transcript) }
                    p { (transcript) }
                }
            }
        }
    }
}

fn tutorial(c: &TutorialContent, l: &Labels) -> Markup {
    html! {
        div.tutorial {
            @if let Some(time) = &c.estimated_time {
                p.estimated-time { (l.estimated_time) ": " (time) }
            }
            @if !c.prerequisites.is_empty() {
                section.prerequisites {
                    h2 { (l.prerequisites) }
                    ul {
                        @for p in &c.prerequisites {
                            li { (p) }
                        }
                    }
                }
            }
            ol.steps {
                @for step in &c.steps {
                    li.step {
                        h3 { (step.title) }
                        @if let Some(image) = &step.image {
                            img src=(image) alt=(step.title) loading="lazy";
                        }
                        p { (step.description) }
                        @if !step.tips.is_empty() {
                            aside.tips {
                                strong { (l.tips) }
                                ul {
                                    @for tip in &step.tips {
                                        li { (tip) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{ArticleSection, TutorialStep};
    use serde_json::json;

    fn render(post: &Post) -> String {
        PostTemplateFactory::new(Locale::En).render(post).into_string()
    }

    #[test]
    fn select_known_types() {
        let factory = PostTemplateFactory::default();
        for t in PostType::ALL {
            assert_eq!(factory.select_template(&t.into()), t);
        }
    }

    #[test]
    fn unknown_type_falls_back_to_article() {
        let factory = PostTemplateFactory::default();
        let tag = PostTypeTag::Unknown("unknown-type".to_string());
        assert_eq!(factory.select_template(&tag), PostType::Article);
    }

    #[test]
    fn unknown_type_renders_article_body() {
        let mut post: Post = serde_json::from_value(json!({
            "slug": "x",
            "title": "Mystery",
            "postType": "unknown-type",
            "content": {"sections": [{"title": "Only", "content": "Body text"}]}
        }))
        .unwrap();
        let html = render(&post);
        assert!(html.contains(r#"data-template="article""#));
        assert!(html.contains("Body text"));

        post.content = json!(null);
        assert!(render(&post).contains("Mystery"));
    }

    #[test]
    fn mismatched_payload_renders_empty_template() {
        let post: Post = serde_json::from_value(json!({
            "slug": "x",
            "title": "Deck",
            "postType": "slideshow",
            "content": {"not": "a list"}
        }))
        .unwrap();
        let html = render(&post);
        assert!(html.contains(r#"data-template="slideshow""#));
        assert!(!html.contains("<figure"));
    }

    #[test]
    fn article_sections_render_markdown() {
        let content = ArticleContent {
            introduction: None,
            sections: vec![ArticleSection {
                title: "Materials".to_string(),
                content: "Use **PP** or *PE*.".to_string(),
                image: None,
                kind: None,
            }],
            conclusion: None,
        };
        let post = Post::new("m", "M", "articles", PostContent::Article(content));
        let html = render(&post);
        assert!(html.contains("<strong>PP</strong>"));
        assert!(html.contains("section-text"));
    }

    #[test]
    fn titles_are_escaped() {
        let post = Post::new(
            "x",
            "<script>alert(1)</script>",
            "articles",
            PostContent::Article(ArticleContent::default()),
        );
        let html = render(&post);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn labels_follow_locale() {
        let content = TutorialContent {
            steps: vec![TutorialStep {
                title: "Clean".to_string(),
                description: "Wipe".to_string(),
                image: None,
                tips: vec!["Gloves".to_string()],
            }],
            prerequisites: vec!["Cool mould".to_string()],
            estimated_time: Some("10 min".to_string()),
        };
        let post = Post::new("t", "T", "tutorials", PostContent::Tutorial(content));
        let hu = PostTemplateFactory::new(Locale::Hu).render(&post).into_string();
        assert!(hu.contains("Előfeltételek"));
        assert!(hu.contains("Tippek"));
        let de = PostTemplateFactory::new(Locale::De).render(&post).into_string();
        assert!(de.contains("Voraussetzungen"));
    }

    #[test]
    fn slideshow_marks_slide_kinds() {
        let slides = vec![
            SlideContent {
                image: "/1.jpg".to_string(),
                alt: "one".to_string(),
                text: "Intro".to_string(),
                title: None,
                kind: Some(SlideKind::Intro),
            },
            SlideContent {
                image: "/2.jpg".to_string(),
                alt: "two".to_string(),
                text: "End".to_string(),
                title: Some("Wrap-up".to_string()),
                kind: Some(SlideKind::Conclusion),
            },
        ];
        let post = Post::new("s", "S", "presentations", PostContent::Slideshow(slides));
        let html = render(&post);
        assert!(html.contains("slide-intro"));
        assert!(html.contains("slide-conclusion"));
        assert!(html.contains("<h2>Wrap-up</h2>"));
    }

    #[test]
    fn video_poster_is_optional() {
        let post = Post::new(
            "v",
            "V",
            "videos",
            PostContent::Video(VideoContent {
                video_url: "/v.mp4".to_string(),
                ..Default::default()
            }),
        );
        let html = render(&post);
        assert!(html.contains(r#"src="/v.mp4""#));
        assert!(!html.contains("poster"));
    }
}
