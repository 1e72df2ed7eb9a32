//! Word valences for the lexical scorer
//!
//! AFINN-style integer ratings from -5 (very negative) to +5 (very
//! positive), restricted to vocabulary that shows up in search snippets
//! about companies, products and people.

pub(super) const WORD_VALENCES: &[(&str, i32)] = &[
    ("abandon", -2),
    ("abandoned", -2),
    ("abuse", -3),
    ("abused", -3),
    ("accident", -2),
    ("accuse", -2),
    ("accused", -2),
    ("admire", 3),
    ("adore", 3),
    ("advantage", 2),
    ("afraid", -2),
    ("aggressive", -2),
    ("alarmed", -2),
    ("amazing", 4),
    ("angry", -3),
    ("annoy", -2),
    ("annoying", -2),
    ("anxious", -2),
    ("applaud", 2),
    ("appreciate", 2),
    ("approve", 2),
    ("arrest", -2),
    ("arrested", -3),
    ("attack", -1),
    ("awesome", 4),
    ("award", 3),
    ("awful", -3),
    ("bad", -3),
    ("ban", -2),
    ("banned", -2),
    ("bankrupt", -3),
    ("bankruptcy", -3),
    ("beautiful", 3),
    ("benefit", 2),
    ("best", 3),
    ("better", 2),
    ("betray", -3),
    ("betrayed", -3),
    ("blame", -2),
    ("boring", -3),
    ("breach", -2),
    ("brilliant", 4),
    ("broken", -1),
    ("cancel", -1),
    ("catastrophe", -3),
    ("cheat", -3),
    ("cheated", -3),
    ("clean", 2),
    ("collapse", -2),
    ("complain", -2),
    ("complaint", -2),
    ("complaints", -2),
    ("condemn", -2),
    ("confused", -2),
    ("corrupt", -3),
    ("corruption", -2),
    ("crash", -2),
    ("crime", -3),
    ("crisis", -3),
    ("criticism", -2),
    ("criticize", -2),
    ("danger", -2),
    ("dangerous", -2),
    ("dead", -3),
    ("death", -2),
    ("debt", -2),
    ("deceived", -3),
    ("defect", -3),
    ("defective", -2),
    ("delay", -1),
    ("delayed", -1),
    ("delighted", 3),
    ("deny", -2),
    ("disappointed", -2),
    ("disappointing", -2),
    ("disaster", -2),
    ("dishonest", -2),
    ("dislike", -2),
    ("dispute", -2),
    ("distrust", -3),
    ("doubt", -1),
    ("dreadful", -3),
    ("easy", 1),
    ("effective", 2),
    ("efficient", 2),
    ("enjoy", 2),
    ("excellent", 3),
    ("exciting", 3),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("fake", -3),
    ("fantastic", 4),
    ("fault", -2),
    ("favorite", 2),
    ("fine", 2),
    ("fraud", -4),
    ("fraudulent", -4),
    ("free", 1),
    ("fun", 4),
    ("glad", 3),
    ("good", 3),
    ("great", 3),
    ("greed", -3),
    ("guilty", -3),
    ("happy", 3),
    ("harm", -2),
    ("hate", -3),
    ("helpful", 2),
    ("honest", 2),
    ("horrible", -3),
    ("hurt", -2),
    ("illegal", -3),
    ("impressive", 3),
    ("improve", 2),
    ("improved", 2),
    ("incompetent", -2),
    ("innovative", 2),
    ("lawsuit", -2),
    ("liar", -3),
    ("lie", -2),
    ("lies", -2),
    ("lose", -3),
    ("loss", -3),
    ("losses", -3),
    ("love", 3),
    ("loved", 3),
    ("lucky", 3),
    ("mess", -2),
    ("misleading", -3),
    ("mistake", -2),
    ("negative", -2),
    ("neglect", -2),
    ("nice", 3),
    ("outstanding", 5),
    ("pain", -2),
    ("panic", -3),
    ("perfect", 3),
    ("pleased", 3),
    ("poor", -2),
    ("positive", 2),
    ("problem", -2),
    ("problems", -2),
    ("profit", 2),
    ("promise", 1),
    ("proud", 2),
    ("recall", -2),
    ("recommend", 2),
    ("reliable", 2),
    ("reward", 2),
    ("risk", -2),
    ("robust", 2),
    ("rude", -2),
    ("sad", -2),
    ("safe", 1),
    ("scam", -2),
    ("scandal", -3),
    ("scared", -2),
    ("secure", 2),
    ("severe", -2),
    ("shame", -2),
    ("slow", -2),
    ("spam", -2),
    ("steal", -2),
    ("stolen", -2),
    ("strong", 2),
    ("stupid", -2),
    ("success", 2),
    ("successful", 3),
    ("sue", -2),
    ("sued", -2),
    ("superb", 5),
    ("support", 2),
    ("terrible", -3),
    ("thank", 2),
    ("thanks", 2),
    ("threat", -2),
    ("toxic", -2),
    ("trouble", -2),
    ("trust", 1),
    ("trusted", 2),
    ("ugly", -3),
    ("unfair", -2),
    ("unhappy", -2),
    ("unreliable", -2),
    ("unsafe", -2),
    ("useful", 2),
    ("useless", -2),
    ("victim", -3),
    ("violation", -2),
    ("warning", -3),
    ("waste", -1),
    ("weak", -2),
    ("win", 4),
    ("winner", 4),
    ("wonderful", 4),
    ("worry", -3),
    ("worse", -3),
    ("worst", -3),
    ("wrong", -2),
];

/// Tokens that flip the valence of the word right after them
pub(super) const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "can't",
    "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't", "won't", "wouldn't",
    "shouldn't", "couldn't", "hasn't", "haven't", "hadn't", "without",
];
