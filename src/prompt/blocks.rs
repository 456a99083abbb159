use crate::form::{AdvancedSettings, Elements, Niche, SeoLevel};

pub fn niche_block(niche: Niche) -> Option<&'static str> {
    let block = match niche {
        Niche::General => return None,
        Niche::Recipes => r#"Recipe Content Requirements:
- Open with a short personal hook about the dish, then get to the recipe quickly.
- Include a clear ingredient list with exact quantities and metric conversions.
- Provide numbered, step-by-step cooking instructions with times and temperatures.
- State prep time, cook time, total time, servings and approximate calories per serving.
- Add substitution ideas for common dietary needs (vegan, gluten-free, dairy-free).
- Finish with storage, reheating and serving suggestions."#,
        Niche::Technology => r#"Technology Content Requirements:
- Explain technical concepts precisely, defining jargon the first time it appears.
- Include concrete specifications, version numbers or benchmarks where relevant.
- Compare alternatives fairly and state the trade-offs of each.
- Add practical setup or usage steps the reader can follow.
- Mention compatibility, security or privacy considerations."#,
        Niche::Health => r#"Health Content Requirements:
- Write in line with current medical consensus and cite reputable organisations (WHO, NIH, CDC).
- Avoid diagnosing; encourage readers to consult a qualified healthcare professional.
- Explain symptoms, causes and evidence-based options in plain language.
- Do not make exaggerated or guaranteed health claims.
- Include a short medical disclaimer at the end."#,
        Niche::Finance => r#"Personal Finance Content Requirements:
- Use concrete numbers and worked examples (e.g. monthly savings, interest over time).
- Explain risks alongside potential returns; never promise results.
- Define financial terms such as APR, compound interest or diversification when used.
- Give actionable steps the reader can take this week.
- Add a note that the article is not personalised financial advice."#,
        Niche::Travel => r#"Travel Content Requirements:
- Give practical logistics: how to get there, best time to visit, typical costs.
- Recommend specific neighbourhoods, sights and local food to try.
- Include safety tips and local etiquette.
- Suggest a sample itinerary with a day-by-day outline.
- Mention budget and premium options."#,
        Niche::Fitness => r#"Fitness Content Requirements:
- Describe exercises with sets, reps, rest times and correct form cues.
- Offer beginner, intermediate and advanced variations.
- Explain which muscles each movement targets.
- Include warm-up and cool-down guidance.
- Remind readers to check with a professional before starting a new programme."#,
        Niche::Fashion => r#"Fashion & Beauty Content Requirements:
- Reference current seasonal trends and explain how to adapt them to different body types and budgets.
- Suggest specific outfit combinations or routines step by step.
- Mention materials, care instructions and sustainability where relevant.
- Keep the tone inspiring and inclusive."#,
        Niche::Education => r#"Education Content Requirements:
- Structure the article as a lesson with clear learning objectives up front.
- Break complex topics into small steps with examples after each one.
- Include a short self-check quiz or reflection questions.
- Recommend further reading or free learning resources."#,
        Niche::RealEstate => r#"Real Estate Content Requirements:
- Use market data and typical price ranges, noting that figures vary by location.
- Explain the buying, selling or renting process step by step.
- Define terms such as escrow, closing costs and appraisal.
- Include a checklist readers can use when viewing a property."#,
        Niche::Automotive => r#"Automotive Content Requirements:
- Include specifications such as engine, power, fuel economy and price range.
- Compare with two or three competing models.
- Cover ownership costs, reliability and maintenance intervals.
- Give a clear verdict on who the vehicle or product suits best."#,
    };
    Some(block)
}

pub fn seo_block(level: SeoLevel) -> &'static str {
    match level {
        SeoLevel::Basic => r#"SEO Guidelines (Basic):
- Use the focus keyword in the title, the first paragraph and at least one H2.
- Keep paragraphs short (2-4 sentences) and easy to scan.
- Write a natural conclusion that restates the main point."#,
        SeoLevel::Intermediate => r#"SEO Guidelines (Intermediate):
- Use the focus keyword in the title, the first 100 words, one H2 and the conclusion.
- Keep keyword density around 1-1.5% without stuffing.
- Work in semantically related keywords and synonyms naturally.
- Use descriptive H2/H3 headings that answer likely search questions.
- Keep sentences under 20 words where possible for readability."#,
        SeoLevel::Advanced => r#"SEO Guidelines (Advanced):
- Place the focus keyword in the title, the first sentence, at least two H2s and the conclusion.
- Target a keyword density of 1-2% and include LSI keywords and entity mentions throughout.
- Structure sections to win featured snippets: a concise 40-60 word answer directly under question-style headings.
- Cover search intent completely, including related questions people also ask.
- Optimise for readability (Flesch score above 60) with transition words in at least 30% of sentences.
- Suggest descriptive alt text for any images referenced."#,
    }
}

/// Fragments for every enabled formatting element, in fixed order.
pub fn element_fragments(elements: &Elements) -> Vec<&'static str> {
    let table: [(bool, &'static str); 8] = [
        (elements.bold, "- Use **bold** text to highlight key phrases and the focus keyword (not more than once per paragraph)."),
        (elements.h3, "- Use H3 subheadings inside longer H2 sections to break up the content."),
        (elements.lists, "- Use bulleted or numbered lists where information is a sequence or a set of items."),
        (elements.tables, "- Include at least one comparison table in Markdown format."),
        (elements.internal_links, "- Suggest 2-3 internal link placements using descriptive anchor text, written as [anchor text](internal-link)."),
        (elements.external_links, "- Reference 1-2 authoritative external sources with descriptive anchor text."),
        (elements.faq, FAQ_FRAGMENT),
        (elements.key_takeaways, "- Start the article with a \"Key Takeaways\" box of 3-5 bullet points summarising the main insights."),
    ];
    table.into_iter().filter(|(on, _)| *on).map(|(_, text)| text).collect()
}

pub const FAQ_FRAGMENT: &str =
    "- End with a \"Frequently Asked Questions\" section of 4-6 questions with concise answers.";

/// Only rendered when the advanced branch is on and both link URLs are set.
pub fn advanced_block(advanced: &AdvancedSettings) -> Option<String> {
    if !advanced.enabled || !advanced.has_links() {
        return None;
    }
    let mut block = format!(
        "Advanced Instructions:
- Insert this internal link naturally in the body: {internal}
- Insert this external reference link naturally in the body: {external}
- Use keyword-rich anchor text for both links and do not place them in the first paragraph.",
        internal = advanced.internal_link_url.trim(),
        external = advanced.external_link_url.trim(),
    );
    let custom = advanced.custom_instructions.trim();
    if !custom.is_empty() {
        block.push_str("\n- Additional instructions: ");
        block.push_str(custom);
    }
    Some(block)
}
