
/// Genres the model was trained with, in feature column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Genre {
    Action,
    Animation,
    Comedy,
    Drama,
    Horror,
    Thriller,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Action,
        Genre::Animation,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::Thriller,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Animation => "animation",
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Horror => "horror",
            Genre::Thriller => "thriller",
        }
    }

    /// Exact tag match, anything else is not a recognized genre.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "action" => Some(Genre::Action),
            "animation" => Some(Genre::Animation),
            "comedy" => Some(Genre::Comedy),
            "drama" => Some(Genre::Drama),
            "horror" => Some(Genre::Horror),
            "thriller" => Some(Genre::Thriller),
            _ => None,
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// Membership set over [`Genre::ALL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenreSet(u8);

impl GenreSet {
    pub fn new() -> Self {
        GenreSet(0)
    }

    /// Builds the set from raw tags, silently dropping unrecognized ones.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = GenreSet::new();
        for tag in tags {
            if let Some(genre) = Genre::from_tag(tag.as_ref()) {
                set.insert(genre);
            }
        }
        set
    }

    /// The tags [`GenreSet::from_tags`] would drop, in input order.
    pub fn unrecognized<'a, I>(tags: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter()
            .map(String::as_str)
            .filter(|tag| Genre::from_tag(tag).is_none())
            .collect()
    }

    pub fn insert(&mut self, genre: Genre) {
        self.0 |= genre.bit();
    }

    pub fn contains(&self, genre: Genre) -> bool {
        self.0 & genre.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Genre> + '_ {
        Genre::ALL.into_iter().filter(|g| self.contains(*g))
    }

    /// One indicator per genre, in declared order.
    pub fn indicators(&self) -> [f64; 6] {
        Genre::ALL.map(|g| if self.contains(g) { 1.0 } else { 0.0 })
    }
}
