use once_cell::sync::Lazy;
use regex::Regex;

static ROOT_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.\s]").unwrap());

pub const SYSTEM_PROMPT: &str = "You are a Hebrew expert. Answer with raw JSON only, without Markdown or code blocks.";

/// Root letters without separating dots or spaces, e.g. `כ.ת.ב` -> `כתב`
pub fn clean_root(root: &str) -> String {
    ROOT_SEPARATORS.replace_all(root, "").into_owned()
}

/// User prompt asking for `count` words derived from `root`
pub fn build_prompt(root: &str, count: usize) -> String {
    format!(
        "I have the Hebrew root \"{root}\" (shoresh, letters {letters}).\n\
         Please generate {count} distinct Hebrew words derived from this root.\n\
         \n\
         For each word, provide:\n\
         1. \"hebrew\": The word in Hebrew with Nikud (vocalized).\n\
         2. \"transliteration\": Standard English transliteration.\n\
         3. \"type\": Part of speech (e.g., Noun, Verb - Pa'al, Adjective).\n\
         4. \"translation\": A clear English definition/translation.\n\
         5. \"example\": An object containing:\n\
            - \"hebrew\": A short, natural example sentence in Hebrew using the word.\n\
            - \"english\": The English translation of the sentence.\n\
         \n\
         Return the result as a raw JSON list of objects.",
        root = root,
        letters = clean_root(root),
        count = count,
    )
}
