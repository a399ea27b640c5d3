//! Static window rules. Grounded on `dwm.c`'s `struct Rule`/`applyrules`.
/// One configured rule: a window whose class/instance/title substring-match
/// gets pinned to a tag set, a monitor, and/or forced floating.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub class: Option<&'static str>,
    pub instance: Option<&'static str>,
    pub title: Option<&'static str>,
    pub tags: u32,
    pub floating: bool,
    /// `num` of the monitor to pin to, if any (`dwm.c`'s `rule->monitor`,
    /// where a negative value means "don't move it").
    pub monitor: Option<u32>,
}

/// Outcome of matching a window's identity against the rule table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleMatch {
    pub tags: u32,
    pub floating: bool,
    pub monitor: Option<u32>,
}

/// `applyrules`'s matching loop: every rule whose non-empty fields are
/// substrings of the window's class/instance/title contributes its tags
/// (OR'd together) and, for floating/monitor, simply overwrites, so later
/// matching rules win — exactly the source's behaviour of re-assigning
/// `c->isfloating`/`c->monitor` unconditionally inside the loop.
pub fn apply_rules(rules: &[Rule], class: &str, instance: &str, title: &str) -> RuleMatch {
    let mut m = RuleMatch::default();

    for rule in rules {
        let class_ok = rule.class.map(|c| class.contains(c)).unwrap_or(true);
        let instance_ok = rule.instance.map(|i| instance.contains(i)).unwrap_or(true);
        let title_ok = rule.title.map(|t| title.contains(t)).unwrap_or(true);

        if class_ok && instance_ok && title_ok {
            m.floating = rule.floating;
            m.tags |= rule.tags;
            if rule.monitor.is_some() {
                m.monitor = rule.monitor;
            }
        }
    }

    m
}

/// The `c->tags = c->tags & TAGMASK ? ... : current_tags(c->monitor)` tail of
/// `applyrules`: fall back to the monitor's current tag set when no rule (or
/// only out-of-range rules) matched.
pub fn resolve_tags(matched: u32, tag_mask: u32, current_monitor_tags: u32) -> u32 {
    let masked = matched & tag_mask;
    if masked != 0 {
        masked
    } else {
        current_monitor_tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &[Rule] = &[
        Rule { class: Some("Gimp"), instance: None, title: None, tags: 1 << 4, floating: true, monitor: None },
        Rule { class: Some("Firefox"), instance: None, title: None, tags: 1 << 1, floating: false, monitor: None },
    ];

    #[test]
    fn matches_on_class_substring() {
        let m = apply_rules(RULES, "Gimp-2.10", "gimp", "GNU Image Manipulation Program");
        assert!(m.floating);
        assert_eq!(m.tags, 1 << 4);
    }

    #[test]
    fn unmatched_window_gets_no_tags() {
        let m = apply_rules(RULES, "URxvt", "urxvt", "term");
        assert_eq!(m.tags, 0);
        assert!(!m.floating);
    }

    #[test]
    fn resolve_tags_falls_back_to_current_monitor_tags() {
        assert_eq!(resolve_tags(0, 0x1ff, 4), 4);
        assert_eq!(resolve_tags(1 << 4, 0x1ff, 4), 1 << 4);
    }
}
