// 🏷️ Classification Rules - Rules as Data
// Ordered (category, keywords) table; the first rule with a keyword hit wins

use crate::matcher::normalize_text;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Label when no keyword rule fires
pub const DEFAULT_CATEGORY: &str = "Other";

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category to assign
    pub category: String,

    /// Any of these appearing as a substring fires the rule
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        CategoryRule {
            category: category.to_string(),
            keywords: keywords.iter().map(|k| normalize_text(k)).collect(),
        }
    }

    /// First keyword contained in already-normalized text
    pub fn first_hit(&self, normalized: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| !keyword.is_empty() && normalized.contains(keyword))
    }

    /// Check if any keyword appears in the text (case-insensitive)
    pub fn matches(&self, text: &str) -> bool {
        self.first_hit(&normalize_text(text)).is_some()
    }
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub category: String,

    /// Position of the rule that fired (None = default label)
    pub rule_index: Option<usize>,

    /// Keyword that fired it
    pub keyword: Option<String>,
}

impl ClassificationResult {
    pub fn is_default(&self) -> bool {
        self.rule_index.is_none()
    }
}

// ============================================================================
// RULE ENGINE
// ============================================================================

pub struct RuleEngine {
    rules: Vec<CategoryRule>,
    default_category: String,
}

impl RuleEngine {
    /// Engine with the built-in food category table
    pub fn new() -> Self {
        RuleEngine::from_rules(builtin_rules())
    }

    /// Load rules from JSON file (array of { category, keywords })
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rules file: {:?}", path.as_ref()))?;

        let rules: Vec<CategoryRule> =
            serde_json::from_str(&content).context("Failed to parse rules JSON")?;

        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                keywords: rule.keywords.iter().map(|k| normalize_text(k)).collect(),
                ..rule
            })
            .collect();

        Ok(RuleEngine::from_rules(rules))
    }

    /// Create engine from a list of rules. List order is evaluation order.
    pub fn from_rules(rules: Vec<CategoryRule>) -> Self {
        RuleEngine {
            rules,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Builder pattern: change the fallback label
    pub fn with_default_category(mut self, label: impl Into<String>) -> Self {
        self.default_category = label.into();
        self
    }

    /// Walk the rules in order; the first one with a keyword hit wins
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let normalized = normalize_text(text);

        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(keyword) = rule.first_hit(&normalized) {
                return ClassificationResult {
                    category: rule.category.clone(),
                    rule_index: Some(index),
                    keyword: Some(keyword.to_string()),
                };
            }
        }

        ClassificationResult {
            category: self.default_category.clone(),
            rule_index: None,
            keyword: None,
        }
    }

    /// Category for a matched pair. The vocabulary entry decides;
    /// the raw description is only used when the entry is blank.
    pub fn classify_match(&self, description: &str, entry: &str) -> ClassificationResult {
        if normalize_text(entry).is_empty() {
            return self.classify(description);
        }
        self.classify(entry)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// BUILT-IN TABLE
// ============================================================================

/// Food categories in priority order. Several keywords appear in more than
/// one rule ("beans", "lasagna", "jerky"...); the earlier rule takes them.
pub fn builtin_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("Protein - Poultry", &["chicken", "turkey", "poultry"]),
        CategoryRule::new(
            "Protein - Meat",
            &[
                "beef", "pork", "meat", "steak", "brisket", "ribeye", "sirloin", "sausage",
                "bacon", "ham", "pepperoni", "salami", "hot dog", "bratwurst", "jerky", "gyro",
                "shawarma", "meatloaf", "lasagna",
            ],
        ),
        CategoryRule::new(
            "Protein - Seafood",
            &[
                "salmon", "tuna", "shrimp", "fish", "cod", "tilapia", "sardines", "mackerel",
                "sushi", "poke", "clam", "crab", "mussels", "calamari", "tempura",
            ],
        ),
        CategoryRule::new(
            "Protein - Plant-Based",
            &[
                "tofu", "tempeh", "lentils", "chickpeas", "hummus", "falafel", "edamame",
                "beans", "impossible", "beyond", "vegan", "veggie burger", "seitan", "soy",
            ],
        ),
        CategoryRule::new("Protein - Eggs", &["egg", "omelette", "scrambled"]),
        CategoryRule::new(
            "Grains & Starches",
            &[
                "rice", "quinoa", "couscous", "farro", "barley", "oatmeal", "oats", "granola",
                "pasta", "spaghetti", "penne", "fettuccine", "macaroni", "lasagna", "ravioli",
                "gnocchi", "noodles", "ramen", "soba", "udon", "tortillas", "pita", "naan",
                "bagel", "bread", "roll", "sourdough",
            ],
        ),
        CategoryRule::new(
            "Vegetables",
            &[
                "broccoli", "cauliflower", "carrots", "celery", "spinach", "kale", "lettuce",
                "greens", "peppers", "tomatoes", "cucumbers", "avocado", "onions", "potatoes",
                "sweet potatoes", "zucchini", "squash", "mushrooms", "eggplant", "cabbage",
                "brussels", "kimchi", "sauerkraut", "beans", "peas", "corn", "asparagus",
                "bok choy", "pickles", "jalapeno", "salsa", "guacamole", "coleslaw",
                "artichokes", "seaweed", "beets", "radish", "pumpkin", "turnips",
            ],
        ),
        CategoryRule::new(
            "Fruits",
            &[
                "apple", "banana", "orange", "mandarin", "grapes", "strawberries", "blueberries",
                "raspberries", "blackberries", "mango", "pineapple", "watermelon", "cantaloupe",
                "honeydew", "kiwi", "peaches", "plums", "nectarines", "pomegranate", "pears",
                "cherries", "guava", "papaya", "passion fruit", "cranberries", "raisins",
                "dates", "figs", "lemon", "lime", "grapefruit",
            ],
        ),
        CategoryRule::new(
            "Dairy & Alternatives",
            &[
                "milk", "cream", "yogurt", "cheese", "cottage", "butter", "margarine",
                "ice cream", "frozen yogurt", "ricotta", "parmesan", "feta", "goat cheese",
                "kefir", "whipped cream",
            ],
        ),
        CategoryRule::new(
            "Breakfast",
            &[
                "pancakes", "waffles", "french toast", "breakfast", "hash browns",
                "chia pudding", "cereal",
            ],
        ),
        CategoryRule::new(
            "Sandwiches & Wraps",
            &["sandwich", "wrap", "burrito", "quesadilla", "tacos", "pita"],
        ),
        CategoryRule::new(
            "Frozen & Ready Meals",
            &["frozen", "microwave", "bento", "tv dinner", "heat and eat"],
        ),
        CategoryRule::new(
            "Snacks",
            &[
                "chips", "crackers", "pretzels", "popcorn", "nuts", "almonds", "walnuts",
                "cashews", "pistachios", "peanut butter", "almond butter", "rice cakes",
                "jerky", "fruit snacks", "chocolate", "cookies", "brownies", "muffins",
                "banana bread", "protein bar", "granola bar", "trail mix", "edamame snack",
                "seaweed snacks", "veggie straws",
            ],
        ),
        CategoryRule::new(
            "Drinks",
            &[
                "water", "soda", "coffee", "tea", "latte", "cappuccino", "lemonade", "smoothie",
                "shake", "sports drink", "energy drink", "juice", "kombucha", "milkshake",
                "chai", "matcha",
            ],
        ),
        CategoryRule::new(
            "Desserts",
            &[
                "cake", "cupcakes", "donuts", "pie", "pudding", "sorbet", "cheesecake",
                "tiramisu", "mochi", "churros", "cinnamon rolls", "banana split",
            ],
        ),
        CategoryRule::new(
            "Salads",
            &[
                "salad", "caesar", "greek", "garden", "cobb", "quinoa salad", "lentil salad",
                "pasta salad", "fruit salad",
            ],
        ),
        CategoryRule::new(
            "International & Ethnic",
            &[
                "pad thai", "pho", "ramen", "bibimbap", "tikka", "masala", "biryani", "curry",
                "gyro", "shawarma", "falafel", "poke bowl", "teriyaki", "katsu",
                "spring rolls", "dumplings", "gyoza", "poutine", "empanada", "tamales",
                "enchiladas", "arepas",
            ],
        ),
        CategoryRule::new("Pizza", &["pizza"]),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_keyword_match_case_insensitive() {
        let rule = CategoryRule::new("Protein - Seafood", &["salmon"]);

        assert!(rule.matches("Atlantic SALMON, farmed"));
        assert!(rule.matches("smoked salmon"));
        assert!(!rule.matches("tuna"));
    }

    #[test]
    fn test_builtin_order() {
        let engine = RuleEngine::new();
        let order: Vec<&str> = engine.rules().iter().map(|r| r.category.as_str()).collect();

        assert_eq!(
            order,
            vec![
                "Protein - Poultry",
                "Protein - Meat",
                "Protein - Seafood",
                "Protein - Plant-Based",
                "Protein - Eggs",
                "Grains & Starches",
                "Vegetables",
                "Fruits",
                "Dairy & Alternatives",
                "Breakfast",
                "Sandwiches & Wraps",
                "Frozen & Ready Meals",
                "Snacks",
                "Drinks",
                "Desserts",
                "Salads",
                "International & Ethnic",
                "Pizza",
            ]
        );
    }

    #[test]
    fn test_classify_common_foods() {
        let engine = RuleEngine::new();

        assert_eq!(engine.classify("apple").category, "Fruits");
        assert_eq!(engine.classify("banana").category, "Fruits");
        assert_eq!(engine.classify("whole milk").category, "Dairy & Alternatives");
        assert_eq!(engine.classify("coffee").category, "Drinks");
        assert_eq!(engine.classify("pizza").category, "Pizza");
        assert_eq!(engine.classify("broccoli").category, "Vegetables");
    }

    #[test]
    fn test_poultry_before_beans() {
        let engine = RuleEngine::new();
        let result = engine.classify("chicken and beans");

        assert_eq!(result.category, "Protein - Poultry");
        assert_eq!(result.rule_index, Some(0));
        assert_eq!(result.keyword.as_deref(), Some("chicken"));
    }

    #[test]
    fn test_ambiguous_keywords_resolve_by_order() {
        let engine = RuleEngine::new();

        // "beans" is in both Plant-Based and Vegetables
        assert_eq!(engine.classify("black beans").category, "Protein - Plant-Based");
        // "lasagna" is in both Meat and Grains
        assert_eq!(engine.classify("lasagna").category, "Protein - Meat");
        // "egg" fires before "eggplant" is ever looked at
        assert_eq!(engine.classify("eggplant").category, "Protein - Eggs");
        // "chocolate" (Snacks) beats "cake" (Desserts)
        assert_eq!(engine.classify("chocolate cake").category, "Snacks");
    }

    #[test]
    fn test_no_match_uses_default() {
        let engine = RuleEngine::new();
        let result = engine.classify("xyzzy");

        assert_eq!(result.category, "Other");
        assert!(result.is_default());
        assert_eq!(result.keyword, None);

        let engine = RuleEngine::new().with_default_category("Misc");
        assert_eq!(engine.classify("").category, "Misc");
    }

    #[test]
    fn test_classify_match_uses_vocabulary_entry() {
        let engine = RuleEngine::new();

        // description mentions cheese, but the matched entry decides
        let result = engine.classify_match("Cheese, pizza topping", "pizza");
        assert_eq!(result.category, "Pizza");

        let result = engine.classify_match("Salmon, raw", "");
        assert_eq!(result.category, "Protein - Seafood");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"category": "Legumes", "keywords": ["BEANS", "lentils"]}},
                {{"category": "Greens", "keywords": ["kale"]}}]"#
        )
        .unwrap();

        let engine = RuleEngine::from_file(file.path()).unwrap();
        assert_eq!(engine.rule_count(), 2);
        assert_eq!(engine.classify("Black Beans").category, "Legumes");
        assert_eq!(engine.classify("kale chips").category, "Greens");
    }

    #[test]
    fn test_punctuated_keywords_normalized() {
        let rule = CategoryRule::new("Protein - Meat", &["Hot-Dog"]);
        assert_eq!(rule.keywords, vec!["hot dog".to_string()]);
        assert!(rule.matches("hot dog, beef"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"category": "Street Food", "keywords": ["hot-dog", "Mac & Cheese"]}}]"#).unwrap();

        let engine = RuleEngine::from_file(file.path()).unwrap();
        assert_eq!(engine.classify("Hot-dog, with bun").category, "Street Food");
        assert_eq!(engine.classify("mac & cheese").category, "Street Food");
    }

    #[test]
    fn test_from_file_missing() {
        assert!(RuleEngine::from_file("/nonexistent/rules.json").is_err());
    }
}
