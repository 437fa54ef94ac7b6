/// Longest slug a note may carry; derived slugs are cut to this length.
pub const SLUG_MAX_LENGTH: usize = 100;

/// Build a URL-safe slug from a note title.
///
/// Cyrillic letters are transliterated to Latin, `&` becomes `and`, runs of
/// whitespace and hyphens collapse into a single `-`, and any other character
/// outside `[a-z0-9_-]` is dropped. The result is lowercase ASCII.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase().replace('&', " and ");

    let mut slug = String::with_capacity(lowered.len());
    let mut in_separator = false;

    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                slug.push('-');
                in_separator = true;
            }
            continue;
        }
        in_separator = false;

        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if let Some(latin) = transliterate(c) {
            slug.push_str(latin);
        }
    }

    slug.truncate(SLUG_MAX_LENGTH);
    slug
}

/// True when `slug` only uses letters, digits, underscores and hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// Lowercase Cyrillic only; input has already been lowercased.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' => "",
        'ы' => "yi",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}
