//! Plan rendering as an executable SQL script.

use drift_sql::Statement;

use crate::planner::Plan;

const BANNER_WIDTH: usize = 66;

fn banner(title: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("-- {rule}\n-- {title}\n-- {rule}\n\n")
}

fn section(out: &mut String, title: &str, statements: &[Statement]) {
    out.push_str(&banner(title));
    for statement in statements {
        out.push_str(&statement.render());
        out.push_str(";\n\n");
    }
}

/// Renders the plan as one SQL script: three banner-delimited sections in
/// execution order, one semicolon-terminated statement per entry, closed
/// by a final banner. Sections are always present, even when empty, so a
/// reader can see that a phase had nothing to do.
#[must_use]
pub fn write_script(plan: &Plan) -> String {
    let mut out = String::new();
    section(&mut out, "SECTION BEFORE INSTALL", &plan.pre_install);
    section(&mut out, "SECTION INSTALL", &plan.install);
    section(&mut out, "SECTION AFTER INSTALL", &plan.after_install);
    out.push_str(&banner("END OF UPDATE SCRIPT"));
    out
}
