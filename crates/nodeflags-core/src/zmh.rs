use crate::time_window::TimeWindow;
use std::collections::BTreeMap;

/// Zone Mail Hour per zone as `(zone, start letter, end letter)`.
const STANDARD_ZMH: &[(u16, char, char)] = &[
    (1, 'S', 'U'), // 09:00-10:00
    (2, 'F', 'H'), // 02:30-03:30
    (3, 'm', 'o'), // 18:00-19:00
    (4, 'Q', 'S'), // 08:00-09:00
    (5, 'C', 'E'), // 01:00-02:00
    (6, 'q', 's'), // 20:00-21:00
];

pub fn standard_zone_mail_hours() -> BTreeMap<u16, TimeWindow> {
    STANDARD_ZMH
        .iter()
        .filter_map(|&(zone, start, end)| Some((zone, TimeWindow::from_letters(start, end)?)))
        .collect()
}
