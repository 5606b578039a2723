use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Definition, GENERAL_POS, MeaningGroup};

/// A leading part-of-speech abbreviation followed by `. ` and the senses
static TAGGED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z]+)\.\s+(.+)").expect("tagged line pattern"));

/// Normalize a part-of-speech abbreviation (`n`, `adj`, ...) to its full name.
///
/// Unrecognized abbreviations pass through unchanged.
pub fn normalize_pos(abbreviation: &str) -> String {
    let full = match abbreviation.to_lowercase().as_str() {
        "n" => "noun",
        "v" => "verb",
        "adj" => "adjective",
        "adv" => "adverb",
        "prep" => "preposition",
        "conj" => "conjunction",
        "interj" => "interjection",
        "pron" => "pronoun",
        "art" => "article",
        "det" => "determiner",
        "num" => "numeral",
        _ => return abbreviation.to_string(),
    };
    full.to_string()
}

/// Split the text after a tag into individual senses.
///
/// Senses are separated by ASCII or full-width semicolons and commas; blank
/// candidates are dropped.
pub fn split_senses(text: &str) -> Vec<&str> {
    text.split([';', '；', ',', '，'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// A parser for the combined translation/definition text of a dictionary record.
///
/// The grammar is line oriented:
///
/// ```text
/// text  := line ("\n" line)*
/// line  := tag ". " senses | plain
/// senses := sense ((";" | "；" | "," | "，") sense)*
/// ```
///
/// A tagged line opens a new [`MeaningGroup`]; a plain line is one sense
/// appended to the open group (or to a fresh `"general"` group). Groups come
/// out in order of first appearance.
pub struct Parser<'a> {
    input: &'a str,
    groups: Vec<MeaningGroup>,
    current_pos: Option<String>,
    current_defs: Vec<Definition>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            groups: Vec::new(),
            current_pos: None,
            current_defs: Vec::new(),
        }
    }

    /// Move the open group to the output if it holds any sense
    fn flush(&mut self) {
        let definitions = std::mem::take(&mut self.current_defs);
        if let Some(pos) = self.current_pos.take() {
            if !definitions.is_empty() {
                self.groups.push(MeaningGroup::new(pos, definitions));
            }
        }
    }

    fn parse_tagged(&mut self, tag: &str, senses: &str) {
        self.flush();
        self.current_pos = Some(normalize_pos(tag));
        // The source's translation side is already in the target language.
        self.current_defs = split_senses(senses)
            .into_iter()
            .map(Definition::localized)
            .collect();
    }

    fn parse_plain(&mut self, line: &str) {
        if self.current_pos.is_none() {
            self.current_pos = Some(GENERAL_POS.to_string());
            self.current_defs.clear();
        }
        self.current_defs.push(Definition::localized(line));
    }

    pub fn parse(mut self) -> Vec<MeaningGroup> {
        let input = self.input;
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match TAGGED_LINE.captures(line) {
                Some(caps) => self.parse_tagged(&caps[1], &caps[2]),
                None => self.parse_plain(line),
            }
        }
        self.flush();
        self.groups
    }
}

/// Parse combined text into part-of-speech groups
pub fn parse_meanings(text: &str) -> Vec<MeaningGroup> {
    Parser::new(text).parse()
}
