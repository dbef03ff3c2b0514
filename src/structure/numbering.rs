use std::collections::HashMap;

use crate::model::Section;

pub const MAX_SECTION_DEPTH: usize = 6;

/// Display numbers for sections given in document order.
///
/// Level-1 sections read `Section <k>` with `k` counted from zero. Deeper
/// sections join the per-level counters with dots, where the first component
/// is the enclosing level-1 section's `k`. Counters below a level are cleared
/// whenever a section at the same or a shallower level is reached.
pub fn number_sections(levels: &[u32]) -> Vec<String> {
    let mut counters = [0_i64; MAX_SECTION_DEPTH];
    let mut last_level = 1usize;
    let mut numbers = Vec::<String>::with_capacity(levels.len());

    for raw_level in levels {
        let level = (*raw_level as usize).clamp(1, MAX_SECTION_DEPTH);

        if level <= last_level {
            for counter in counters.iter_mut().skip(level) {
                *counter = 0;
            }
        }

        if level == 1 {
            counters[0] += 1;
            numbers.push(format!("Section {}", counters[0] - 1));
        } else {
            counters[level - 1] += 1;
            let parts = (0..level)
                .map(|index| {
                    if index == 0 {
                        (counters[0] - 1).to_string()
                    } else {
                        counters[index].to_string()
                    }
                })
                .collect::<Vec<String>>();
            numbers.push(parts.join("."));
        }

        last_level = level;
    }

    numbers
}

pub fn section_number_map(sections: &[Section]) -> HashMap<String, String> {
    let levels = sections
        .iter()
        .map(|section| section.level)
        .collect::<Vec<u32>>();

    sections
        .iter()
        .zip(number_sections(&levels))
        .map(|(section, number)| (section.id.clone(), number))
        .collect()
}
