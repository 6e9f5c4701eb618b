// tests/intent_tests.rs
mod common;

use common::*;
use concierge::models::{AgentName, IntentLabel};
use concierge::IntentClassifier;

#[test]
fn test_reference_messages_classify_as_expected() {
  setup_tracing();
  let classifier = IntentClassifier::new();
  assert_eq!(classifier.classify("I want to buy a watch").label, IntentLabel::Order);
  assert_eq!(classifier.classify("what is the return policy").label, IntentLabel::Details);
  assert_eq!(
    classifier.classify("recommend something like this").label,
    IntentLabel::Recommendation
  );
  assert_eq!(classifier.classify("asdf qwer").label, IntentLabel::Unknown);
}

#[test]
fn test_score_counts_distinct_patterns_not_occurrences() {
  let classifier = IntentClassifier::new();
  // "buy" + "I want to buy"
  assert_eq!(classifier.classify("I want to buy a watch").score, 2);
  // Repeating the verb does not add anything.
  assert_eq!(classifier.classify("I want to buy buy buy a watch").score, 2);
}

#[test]
fn test_matching_is_case_insensitive() {
  let classifier = IntentClassifier::new();
  assert_eq!(classifier.classify("CAN YOU RECOMMEND SOMETHING").label, IntentLabel::Recommendation);
  assert_eq!(classifier.classify("Checkout PLEASE").label, IntentLabel::Order);
}

#[test]
fn test_ties_resolve_to_unknown() {
  let classifier = IntentClassifier::new();
  let scores = classifier.scores("recommend the price");
  assert!(scores.contains(&(IntentLabel::Details, 1)));
  assert!(scores.contains(&(IntentLabel::Recommendation, 1)));

  let intent = classifier.classify("recommend the price");
  assert_eq!(intent.label, IntentLabel::Unknown);
  assert_eq!(intent.score, 1);
}

#[test]
fn test_no_match_is_unknown_with_zero_score() {
  let intent = IntentClassifier::new().classify("lorem ipsum dolor");
  assert_eq!(intent.label, IntentLabel::Unknown);
  assert_eq!(intent.score, 0);
}

#[test]
fn test_allergen_and_nutrition_vocabulary_is_details() {
  let classifier = IntentClassifier::new();
  assert_eq!(classifier.classify("is it gluten free and vegan").label, IntentLabel::Details);
  assert_eq!(classifier.classify("any allergy warnings on it?").label, IntentLabel::Details);
}

#[test]
fn test_classification_is_stateless() {
  let classifier = IntentClassifier::new();
  let first = classifier.classify("what features does the smart watch have");
  classifier.classify("I want to buy a watch");
  let again = classifier.classify("what features does the smart watch have");
  assert_eq!(first, again);
}

#[test]
fn test_unknown_routes_to_details_agent() {
  assert_eq!(IntentLabel::Unknown.agent(), AgentName::Details);
  assert_eq!(IntentLabel::Details.agent(), AgentName::Details);
  assert_eq!(IntentLabel::Order.agent(), AgentName::Order);
  assert_eq!(IntentLabel::Recommendation.agent(), AgentName::Recommendation);
}
