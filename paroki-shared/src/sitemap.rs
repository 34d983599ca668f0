/// Static XML sitemap of the public pages

/// Public paths listed in the sitemap with their change frequency and priority
pub const PUBLIC_PAGES: [(&str, &str, &str); 5] = [
    ("/", "daily", "1.0"),
    ("/announcements", "daily", "0.9"),
    ("/activities", "weekly", "0.8"),
    ("/worship-schedules", "weekly", "0.8"),
    ("/church-officials", "monthly", "0.6"),
];

/// Builds the sitemap for an application root such as `https://paroki.example`
pub fn build_sitemap(app_url: &str) -> String {
    let base = app_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for (path, changefreq, priority) in PUBLIC_PAGES {
        let loc = if path == "/" {
            format!("{}/", base)
        } else {
            format!("{}{}", base, path)
        };

        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", crate::report::html::escape(&loc)));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
        xml.push_str(&format!("    <priority>{}</priority>\n", priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
