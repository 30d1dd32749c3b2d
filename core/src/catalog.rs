#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    pub src: &'static str,
    pub title: &'static str,
    pub slug: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Category {
    pub key: &'static str,
    pub title: &'static str,
    pub items: &'static [Item],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HomeIcon {
    pub category: &'static str,
    pub src: &'static str,
    pub label: &'static str,
}

pub const EXTERNAL_LINK_SLUG: &str = "music";
pub const EXTERNAL_LINK_URL: &str = "https://musescore.com/user/30634848/sets";
pub const DEFAULT_DEEP_LINK_CATEGORY: &str = "about";

pub const CATEGORIES: &[Category] = &[
    Category {
        key: "about",
        title: "About Me",
        items: &[
            Item {
                src: "/assets/collage/1.png",
                title: "Who Am I?",
                slug: "about",
            },
            Item {
                src: "/assets/collage/2.png",
                title: "Music",
                slug: EXTERNAL_LINK_SLUG,
            },
        ],
    },
    Category {
        key: "mechanical",
        title: "Mechanical",
        items: &[
            Item {
                src: "/assets/collage/3.jpg",
                title: "Baja Offroading",
                slug: "baja",
            },
            Item {
                src: "/assets/collage/4.png",
                title: "Skygauge Mechanical",
                slug: "skygauge",
            },
            Item {
                src: "/assets/collage/5.jpg",
                title: "Planetary Gearset",
                slug: "planetary-gearset",
            },
            Item {
                src: "/assets/collage/6.png",
                title: "Straumbeest",
                slug: "straumbeest",
            },
        ],
    },
    Category {
        key: "electrical",
        title: "Electrical",
        items: &[
            Item {
                src: "/assets/collage/7.png",
                title: "RC Car",
                slug: "rc-car",
            },
            Item {
                src: "/assets/collage/8.jpg",
                title: "Mechanical Keyboard",
                slug: "keyboard",
            },
        ],
    },
    Category {
        key: "software",
        title: "Software",
        items: &[
            Item {
                src: "/assets/collage/9.png",
                title: "Drone-Assisted Gaussian Splatting",
                slug: "drone-assisted-gaussian-splatting",
            },
            Item {
                src: "/assets/collage/10.jpeg",
                title: "ROS Car",
                slug: "ros-car",
            },
            Item {
                src: "/assets/collage/11.png",
                title: "Horse Hearse",
                slug: "horse-hearse",
            },
        ],
    },
];

pub const HOME_ICONS: &[HomeIcon] = &[
    HomeIcon {
        category: "about",
        src: "/assets/home/bubble.png",
        label: "About Me",
    },
    HomeIcon {
        category: "mechanical",
        src: "/assets/home/gear.png",
        label: "Mechanical",
    },
    HomeIcon {
        category: "electrical",
        src: "/assets/home/lightbulb.png",
        label: "Electrical",
    },
    HomeIcon {
        category: "software",
        src: "/assets/home/monitor.png",
        label: "Software",
    },
];

pub const HOME_MASCOT_SRC: &str = "/assets/home/bidoof.png";

pub fn category_count() -> usize {
    CATEGORIES.len()
}

pub fn category_index(key: &str) -> Option<usize> {
    let trimmed = key.trim();
    CATEGORIES
        .iter()
        .position(|category| category.key.eq_ignore_ascii_case(trimmed))
}

pub fn category_by_key(key: &str) -> Option<&'static Category> {
    category_index(key).map(|index| &CATEGORIES[index])
}

pub fn item_by_slug(slug: &str) -> Option<&'static Item> {
    let trimmed = slug.trim();
    CATEGORIES
        .iter()
        .flat_map(|category| category.items.iter())
        .find(|item| item.slug.eq_ignore_ascii_case(trimmed))
}

/// Looks a slug up inside one category only.
pub fn item_in_category(category: &Category, slug: &str) -> Option<&'static Item> {
    let trimmed = slug.trim();
    category
        .items
        .iter()
        .find(|item| item.slug.eq_ignore_ascii_case(trimmed))
}

/// All items in collage order: category order first, then item order.
pub fn flattened_items() -> impl Iterator<Item = &'static Item> {
    CATEGORIES.iter().flat_map(|category| category.items.iter())
}

pub fn item_index(slug: &str) -> Option<usize> {
    let trimmed = slug.trim();
    flattened_items().position(|item| item.slug.eq_ignore_ascii_case(trimmed))
}

pub fn item_at(index: usize) -> Option<&'static Item> {
    flattened_items().nth(index)
}

pub fn is_external_link(item: &Item) -> bool {
    item.slug == EXTERNAL_LINK_SLUG
}

pub fn project_path(slug: &str) -> String {
    format!("/project/{}", slug.trim())
}

/// Launcher icons, the mascot, and every collage tile, deduplicated in first-seen order.
pub fn critical_images() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    let sources = HOME_ICONS
        .iter()
        .map(|icon| icon.src)
        .chain(std::iter::once(HOME_MASCOT_SRC))
        .chain(flattened_items().map(|item| item.src));
    for src in sources {
        if !out.contains(&src) {
            out.push(src);
        }
    }
    out
}
