/// One lowercase-ish blob for lexical search: text and author are lowercased,
/// hashtags and handles go in as extracted. No deduplication.
pub fn build_search_text(text: &str, author: &str, hashtags: &[String], mentions: &[String]) -> String {
    [
        text.to_lowercase(),
        author.to_lowercase(),
        hashtags.join(" "),
        mentions.join(" "),
    ]
    .join(" ")
}
