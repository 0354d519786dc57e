//! Synthetic post generator used to seed a store with fixture data.

use rand::Rng;
use rand::seq::IndexedRandom;

use blog_core::domain::{Author, BlogPost, NewPost};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Brian", "Claude", "Dennis", "Donald", "Edsger", "Frances", "Grace",
    "Hedy", "Ivan", "Jean", "John", "Ken", "Leslie", "Linus", "Margaret", "Niklaus", "Radia",
    "Robin", "Sophie", "Tim", "Yukihiro",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Backus", "Cerf", "Dijkstra", "Hamilton", "Hopper", "Kernighan", "Knuth", "Lamarr",
    "Lamport", "Liskov", "Lovelace", "McCarthy", "Milner", "Perlman", "Ritchie", "Stroustrup",
    "Sutherland", "Thompson", "Torvalds", "Turing", "Wilson", "Wirth", "Matsumoto",
];

const WORDS: &[&str] = &[
    "amet", "anchor", "atlas", "autumn", "basil", "beacon", "bramble", "cedar", "cinder", "clover",
    "copper", "dolor", "ember", "fable", "fern", "garden", "harbor", "ipsum", "juniper", "lantern",
    "lorem", "marble", "meadow", "nectar", "orchard", "pepper", "quill", "radish", "river", "saffron",
    "sit", "thistle", "timber", "velvet", "willow", "yarrow",
];

/// Generate a post with random author, title, and content.
pub fn generate() -> NewPost {
    generate_with(&mut rand::rng())
}

/// Generate a post drawing from the given RNG.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> NewPost {
    let author = Author::new(pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES));
    let title_len = rng.random_range(3..=6);
    let sentences = rng.random_range(4..=7);

    let title = capitalize(&words(rng, title_len));
    let content = (0..sentences)
        .map(|_| {
            let len = rng.random_range(6..=14);
            format!("{}.", capitalize(&words(rng, len)))
        })
        .collect::<Vec<_>>()
        .join(" ");

    NewPost::new(author, title, content)
}

/// Insert `count` freshly generated posts and return them once all are stored.
pub async fn seed_many(
    store: &dyn PostRepository,
    count: usize,
) -> Result<Vec<BlogPost>, RepoError> {
    let posts = (0..count).map(|_| generate()).collect();
    let stored = store.insert_many(posts).await?;

    tracing::info!(count = stored.len(), "Seeded posts");
    Ok(stored)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, choices: &[&'static str]) -> &'static str {
    choices.choose(rng).copied().unwrap_or_default()
}

fn words<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| pick(rng, WORDS))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
