const TEST_CASE_TRIGGERS: &[&str] = &[
    "test cases",
    "test case",
    "generate cases",
    "create cases",
    "casos de prueba",
    "casos prueba",
    "generar casos",
    "crear casos",
];

const USER_MANUAL_TRIGGERS: &[&str] = &[
    "user manual",
    "user guide",
    "user documentation",
    "documentation user",
    "manual de usuario",
    "manual usuario",
    "manual del usuario",
    "documentacion usuario",
    "guia usuario",
    "guia de usuario",
];

pub fn wants_test_cases(request: &str) -> bool {
    let lower = request.to_lowercase();
    TEST_CASE_TRIGGERS.iter().any(|t| lower.contains(t))
}

pub fn wants_user_manual(request: &str) -> bool {
    let lower = request.to_lowercase().replace('í', "i").replace('ó', "o");
    USER_MANUAL_TRIGGERS.iter().any(|t| lower.contains(t))
}

/// Case layout the scraper in `parsers::cases` understands
pub const TEST_CASE_TEMPLATE: &str = "IMPORTANT: Every test case must follow EXACTLY this structure:

[CP-001] [Test case title]

📄 Description
[Detailed description of what is validated]

📅 Created
[Current date]

🔢 ID No.
[Incremental number]

🗂 Module
[Module or system name]

🚨 Priority
[High/Medium/Low]

🔄 Status
To do

📌 Project
[Project name]

🎯 Expected result
[Expected behavior of the system]

Comments
[Additional notes]

Steps:
1. [First step]
2. [Second step]
3. [Third step]

---

Separate cases with a line containing only ---.
IMPORTANT: ALWAYS use this exact structure for every test case.";

pub const USER_MANUAL_TEMPLATE: &str = "IMPORTANT: Every user manual must follow EXACTLY this structure:

MAIN STRUCTURE OF THE MANUAL:
====================================

User Documentation
[SYSTEM NAME]

INDEX
1. Introduction
   1.1. Project goal
   1.2. System overview
2. User guide
   2.1. Signing in
   2.2. User main menu
3. Module [Name 1]
   3.1. Description
   3.2. [Feature 1]
   3.3. [Feature 2]
[... continue with every module]

====================================
FORMAT FOR EACH MODULE:
====================================

Module [Module name]:

Description:
[Clear explanation of what the module does, its main purpose and how it helps the user]

Main features:
- [Feature 1]: [Short description]
- [Feature 2]: [Short description]

[Feature name]

To [perform this action], follow these steps:

1. [Detailed step 1: where to click, what to look for]
2. [Detailed step 2: the screen that appears]
3. [Detailed step 3: which fields to fill in]
4. [Detailed step 4: how to save or confirm]
5. [Detailed step 5: the confirmation the user sees]

Note: [Useful extra information, tips or warnings]

IMPORTANT: The manual must be descriptive and guide the user step by step. Do NOT include \"Expected result\" or other test case elements. Focus on HOW to use the system, not on validating that it works.";
