//! Default templates compiled into the binary.

use webgen_traits::InMemoryResourceProvider;

const BUNDLED: &[(&str, &str)] = &[
    ("web-page.html", include_str!("../templates/web-page.html")),
    ("menu-item.html", include_str!("../templates/menu-item.html")),
    ("_default.html", include_str!("../templates/_default.html")),
    ("section.html", include_str!("../templates/section.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("list-item.html", include_str!("../templates/list-item.html")),
    ("action.html", include_str!("../templates/action.html")),
    ("filter.html", include_str!("../templates/filter.html")),
    ("form.html", include_str!("../templates/form.html")),
    ("table.html", include_str!("../templates/table.html")),
    ("th.html", include_str!("../templates/th.html")),
    ("td.html", include_str!("../templates/td.html")),
    ("tr.html", include_str!("../templates/tr.html")),
    ("text-input.html", include_str!("../templates/text-input.html")),
    ("select.html", include_str!("../templates/select.html")),
    ("select-item.html", include_str!("../templates/select-item.html")),
    ("label.html", include_str!("../templates/label.html")),
    ("text.html", include_str!("../templates/text.html")),
    (
        "webgen-reporting-specification.wiki",
        include_str!("../templates/webgen-reporting-specification.wiki"),
    ),
];

/// Provider holding the default template set.
pub fn bundled_templates() -> InMemoryResourceProvider {
    InMemoryResourceProvider::from_static(BUNDLED)
}
