//! Slug → icon-name lookup.
//!
//! Icon names are component names from the site's icon set. The CMS never
//! stores them; pages get them from here.

/// Icon for any slug not in the table.
pub const DEFAULT_ICON: &str = "Settings";

/// Icon name for a service, industry, or value slug.
pub fn icon_name(slug: &str) -> &'static str {
    match slug {
        // services
        "5-axis-machining" => "Cog",
        "cnc-turning" => "RotateCw",
        "adaptive-machining" => "Cpu",
        "metrology" => "Ruler",
        "inspection" => "ScanSearch",
        "engineering" => "PenTool",
        "reverse-engineering" => "Layers",
        "prototyping" => "Boxes",
        "assembly" => "Wrench",
        "supply-chain" => "Truck",
        // industries
        "aerospace" => "Plane",
        "defense" => "Shield",
        "energy" => "Zap",
        "space" => "Rocket",
        "medical" => "HeartPulse",
        "semiconductor" => "CircuitBoard",
        "industrial" => "Factory",
        // company values
        "quality" => "BadgeCheck",
        "precision" => "Crosshair",
        "safety" => "HardHat",
        "innovation" => "Lightbulb",
        _ => DEFAULT_ICON,
    }
}
