use crate::form::FormData;

pub mod blocks;

pub const TITLE_COUNT: usize = 10;
pub const DESCRIPTION_COUNT: usize = 10;
pub const TAG_COUNT: usize = 7;

pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MIN_CHARS: usize = 150;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

pub fn system_prompt() -> &'static str {
r#"You are an expert SEO copywriter. Follow the numbered rules exactly.
Return only the requested content: no preamble, no explanations, no closing remarks."#
}

pub fn titles_prompt(data: &FormData) -> String {
    format!(
"Generate {count} SEO-optimised blog post titles for the focus keyword \"{keyword}\".

Rules:
1. Every title must contain the exact focus keyword \"{keyword}\".
2. Every title must be at most {max} characters long.
3. Write in a {tone} tone.
4. Use power words or numbers where they fit naturally; one title must include a random number.
5. Make each title unique in angle and structure.
6. Return exactly {count} titles, one per line, no extra formatting, no numbering, no quotes.",
        count = TITLE_COUNT,
        keyword = data.focus_keyword.trim(),
        max = TITLE_MAX_CHARS,
        tone = data.tone,
    )
}

pub fn descriptions_prompt(data: &FormData) -> String {
    format!(
"Generate {count} SEO meta descriptions for an article titled \"{title}\" with the focus keyword \"{keyword}\".

Rules:
1. Every description must contain the exact focus keyword \"{keyword}\".
2. Every description must be between {min} and {max} characters long.
3. Write in a {tone} tone.
4. End each description with a subtle call to action.
5. Do not repeat the title word for word.
6. Return exactly {count} descriptions, one per line, no extra formatting, no numbering, no quotes.",
        count = DESCRIPTION_COUNT,
        title = data.meta_title.trim(),
        keyword = data.focus_keyword.trim(),
        min = DESCRIPTION_MIN_CHARS,
        max = DESCRIPTION_MAX_CHARS,
        tone = data.tone,
    )
}

pub fn tags_prompt(data: &FormData) -> String {
    format!(
"Generate {count} SEO tags for an article titled \"{title}\" with the focus keyword \"{keyword}\".

Rules:
1. The first tag must be the focus keyword itself.
2. Each tag must be 1-3 words, lowercase.
3. Tags must be relevant to the {niche} niche.
4. Return exactly {count} tags on a single line separated by commas, no extra formatting.",
        count = TAG_COUNT,
        title = data.meta_title.trim(),
        keyword = data.focus_keyword.trim(),
        niche = data.niche.label(),
    )
}

fn article_base(data: &FormData) -> String {
    let title = if data.meta_title.trim().is_empty() {
        format!("an engaging title of your choice built around \"{}\"", data.focus_keyword.trim())
    } else {
        format!("\"{}\"", data.meta_title.trim())
    };
    let mut base = format!(
"Write a complete, original, SEO-optimised article in Markdown.

Article Details:
- Focus keyword: \"{keyword}\"
- Title: {title}
- Tone: {tone}
- Length: approximately {words} words",
        keyword = data.focus_keyword.trim(),
        title = title,
        tone = data.tone,
        words = data.article_size.word_target(),
    );
    if !data.meta_description.trim().is_empty() {
        base.push_str("\n- Meta description: \"");
        base.push_str(data.meta_description.trim());
        base.push('"');
    }
    base.push_str(
"

Structure:
1. Start with the title as an H1 heading.
2. Write an introduction that hooks the reader and uses the focus keyword in the first 100 words.
3. Organise the body into logical H2 sections.
4. Finish with a conclusion that summarises the key points.",
    );
    base
}

/// The full article instruction. Blocks are appended in a fixed order and
/// only when selected; nothing is left behind for an omitted block.
pub fn article_prompt(data: &FormData) -> String {
    let mut parts: Vec<String> = vec![article_base(data)];

    if let Some(niche) = blocks::niche_block(data.niche) {
        parts.push(niche.to_string());
    }
    parts.push(blocks::seo_block(data.seo_level).to_string());

    let fragments = blocks::element_fragments(&data.elements);
    if !fragments.is_empty() {
        parts.push(format!("Formatting Requirements:\n{}", fragments.join("\n")));
    }

    if let Some(advanced) = blocks::advanced_block(&data.advanced) {
        parts.push(advanced);
    }

    parts.push("Return only the article in Markdown, with no commentary before or after it.".into());
    parts.join("\n\n")
}
