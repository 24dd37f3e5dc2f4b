// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::Read;

use super::error::ParseError;
use super::reader::WordReader;
use super::types::{Document, Header, Step};

mod combinator_atoms;

mod types;

mod metadata;

mod scopes;
use scopes::parse_header;

mod events;
pub use events::Steps;

/// Parses a whole vcd document, collecting every value change.
pub fn parse_vcd<R: Read>(input: R) -> Result<Document, ParseError> {
    let (header, steps) = parse_vcd_streaming(input)?;
    let steps = steps.collect::<Result<Vec<Step>, ParseError>>()?;

    Ok(Document::new(header, steps))
}

/// Parses the header eagerly and hands back the value changes as a lazy
/// iterator, so that dumps larger than memory can be processed.
pub fn parse_vcd_streaming<R: Read>(input: R) -> Result<(Header, Steps<R>), ParseError> {
    let mut word_reader = WordReader::new(input);
    let header = parse_header(&mut word_reader)?;

    Ok((header, Steps::new(word_reader)))
}

#[cfg(test)]
mod tests {
    use num::BigUint;
    use rstest::rstest;

    use super::super::error::{GrammarError, Rule};
    use super::super::signal::{LogicLevel, Value};
    use super::super::types::{HeaderItem, ScopeIdx, SignalIdx, Timescale};
    use super::*;

    fn parse(input: &str) -> Result<Document, ParseError> {
        parse_vcd(input.as_bytes())
    }

    fn grammar_err(input: &str) -> GrammarError {
        match parse(input) {
            Err(ParseError::Grammar(err)) => err,
            other => panic!("expected a grammar error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn timescale_units() {
        for expected in Timescale::ALL {
            let unit = expected.unit();
            assert_eq!(Timescale::from_unit(unit), Some(expected));

            let vcd = parse(&format!("$timescale 1 {unit} $end $enddefinitions $end")).unwrap();
            assert_eq!(vcd.timescale(), Some(expected));
            assert_eq!(vcd.header().items(), &[HeaderItem::Timescale(expected)]);
        }
    }

    #[rstest]
    #[case("10")]
    #[case("100")]
    #[case("2")]
    fn timescale_multipliers_other_than_one(#[case] multiplier: &str) {
        let err = grammar_err(&format!("$timescale {multiplier} ns $end"));
        assert_eq!(err.rule, Rule::Timescale);
        assert_eq!(err.found.as_deref(), Some(multiplier));
    }

    #[test]
    fn later_timescale_overwrites() {
        let vcd = parse("$timescale 1 ns $end $timescale 1 ps $end $enddefinitions $end").unwrap();
        assert_eq!(vcd.timescale(), Some(Timescale::Ps));
        assert_eq!(vcd.header().items().len(), 2);
    }

    #[test]
    fn nested_scopes_build_a_tree() {
        let vcd = parse(
            "$scope module top $end
               $var wire 1 ! clk $end
               $scope module cpu $end
                 $var reg 8 \" acc $end
               $upscope $end
               $scope module mem $end $upscope $end
             $upscope $end
             $scope module tb $end $upscope $end
             $enddefinitions $end",
        )
        .unwrap();
        let header = vcd.header();

        assert_eq!(header.root_scopes(), &[ScopeIdx(0), ScopeIdx(3)]);
        let top = header.scope(ScopeIdx(0));
        assert_eq!(top.name(), "top");
        assert_eq!(top.parent(), None);
        assert_eq!(top.child_scopes(), &[ScopeIdx(1), ScopeIdx(2)]);
        assert_eq!(top.child_signals(), &[SignalIdx(0)]);

        let cpu = header.scope(ScopeIdx(1));
        assert_eq!(cpu.parent(), Some(ScopeIdx(0)));
        assert_eq!(cpu.child_signals(), &[SignalIdx(1)]);
        assert_eq!(header.signal(SignalIdx(1)).scope(), Some(ScopeIdx(1)));
        assert_eq!(header.signal_path(SignalIdx(1)), "top.cpu.acc");
        assert_eq!(header.scope(ScopeIdx(3)).name(), "tb");
    }

    #[test]
    fn header_items_keep_declaration_order() {
        let vcd = parse(
            "$date today $end
             $var wire 1 ! orphan $end
             $scope module top $end
             $comment inside $end
             $upscope $end
             $enddefinitions $end",
        )
        .unwrap();
        let items = vcd.header().items();
        assert!(matches!(&items[0], HeaderItem::Section(s) if s.keyword == "date" && s.content == "today"));
        assert_eq!(items[1], HeaderItem::Var(SignalIdx(0)));
        assert_eq!(items[2], HeaderItem::Scope(ScopeIdx(0)));
        assert!(matches!(&items[3], HeaderItem::Section(s) if s.keyword == "comment"));
        assert_eq!(items[4], HeaderItem::Upscope);
        assert_eq!(vcd.header().signal(SignalIdx(0)).scope(), None);
    }

    #[test]
    fn unmatched_upscope() {
        let err = grammar_err("$scope module a $end $upscope $end $upscope $end");
        assert_eq!(err.rule, Rule::Upscope);
        assert_eq!(err.found.as_deref(), Some("$upscope"));
    }

    #[test]
    fn unclosed_scope() {
        let err = grammar_err("$scope module a $end $enddefinitions $end");
        assert_eq!(err.rule, Rule::EndDefinitions);
        assert!(err.expected.contains("[a]"));

        let err = grammar_err("$scope module a $end $scope module b $end $upscope $end");
        assert_eq!(err.rule, Rule::Upscope);
        assert_eq!(err.found, None);
    }

    #[test]
    fn scope_needs_module() {
        let err = grammar_err("$scope task t $end");
        assert_eq!(err.rule, Rule::Scope);
        assert_eq!(err.found.as_deref(), Some("task"));
    }

    #[test]
    fn var_fields_round_trip() {
        let vcd = parse("$var reg 32 %a counter_q $end $var wire 4 # data [3:0] $end").unwrap();
        let signal = vcd.header().signal(SignalIdx(0));
        assert_eq!(signal.kind(), "reg");
        assert_eq!(signal.width(), 32);
        assert_eq!(signal.identifier(), "%a");
        assert_eq!(signal.name(), "counter_q");

        let signal = vcd.header().signal(SignalIdx(1));
        assert_eq!(signal.name(), "data [3:0]");
        assert_eq!(vcd.header().signal_by_identifier("#").map(|s| s.width()), Some(4));
    }

    #[rstest]
    #[case("$var wire abc sig1 $end", "abc")]
    #[case("$var wire 0 ! sig1 $end", "0")]
    #[case("$var wire -1 ! sig1 $end", "-1")]
    #[case("$var w1re 1 ! sig1 $end", "w1re")]
    #[case("$var wire 1 ! $end", "$end")]
    #[case("$var wire 1 ! sig1 extra $end", "extra")]
    fn malformed_var(#[case] input: &str, #[case] offending: &str) {
        let err = grammar_err(input);
        assert_eq!(err.rule, Rule::Var);
        assert_eq!(err.found.as_deref(), Some(offending));
    }

    #[test]
    fn non_numeric_size_is_named() {
        let err = grammar_err("$var wire abc sig1 $end");
        assert!(err.expected.contains("`size`"));
    }

    #[test]
    fn sections_need_an_end() {
        let err = grammar_err("$version Icarus Verilog");
        assert_eq!(err.rule, Rule::Section);
        assert_eq!(err.found, None);
    }

    #[rstest]
    #[case("clk")]
    #[case("$end")]
    #[case("$12")]
    #[case("#0")]
    fn stray_header_words(#[case] word: &str) {
        let err = grammar_err(&format!("{word} $enddefinitions $end"));
        assert_eq!(err.rule, Rule::Header);
        assert_eq!(err.found.as_deref(), Some(word));
    }

    #[rstest]
    #[case('U', LogicLevel::U)]
    #[case('X', LogicLevel::X)]
    #[case('0', LogicLevel::Zero)]
    #[case('1', LogicLevel::One)]
    #[case('Z', LogicLevel::Z)]
    #[case('W', LogicLevel::W)]
    #[case('L', LogicLevel::L)]
    #[case('H', LogicLevel::H)]
    #[case('-', LogicLevel::DontCare)]
    fn scalar_levels(#[case] code: char, #[case] level: LogicLevel) {
        let vcd = parse(&format!("$enddefinitions $end #0 {code}! {code}%^")).unwrap();
        assert_eq!(
            vcd.steps()[0].values,
            vec![
                Value::Scalar {
                    level,
                    identifier: "!".to_string()
                },
                Value::Scalar {
                    level,
                    identifier: "%^".to_string()
                },
            ]
        );
    }

    #[test]
    fn scalar_outside_the_level_set() {
        let err = grammar_err("$enddefinitions $end #0 Q!");
        assert_eq!(err.rule, Rule::Value);
        assert_eq!(err.found.as_deref(), Some("Q!"));
    }

    #[test]
    fn vector_values() {
        let vcd = parse("$enddefinitions $end #0 bUX01ZWLH- ! b1 #").unwrap();
        assert_eq!(
            vcd.steps()[0].values,
            vec![
                Value::Vector {
                    bits: "UX01ZWLH-".to_string(),
                    identifier: "!".to_string()
                },
                Value::Vector {
                    bits: "1".to_string(),
                    identifier: "#".to_string()
                },
            ]
        );
    }

    #[test]
    fn steps_may_be_empty_or_unordered() {
        let vcd = parse("$enddefinitions $end #10 #5 1! #5").unwrap();
        let times: Vec<BigUint> = vcd.steps().iter().map(|s| s.time.clone()).collect();
        assert_eq!(
            times,
            vec![BigUint::from(10u8), BigUint::from(5u8), BigUint::from(5u8)]
        );
        assert!(vcd.steps()[0].values.is_empty());
    }

    #[test]
    fn input_before_the_first_time_marker() {
        let err = grammar_err("$enddefinitions $end 1! #0");
        assert_eq!(err.rule, Rule::TimeMarker);
        assert_eq!(err.found.as_deref(), Some("1!"));
    }

    #[test]
    fn keywords_in_the_value_stream() {
        let err = grammar_err("$enddefinitions $end #0 $dumpvars 1! $end");
        assert_eq!(err.rule, Rule::Value);
        assert_eq!(err.found.as_deref(), Some("$dumpvars"));
    }

    #[test]
    fn enddefinitions_content_is_discarded() {
        let vcd = parse("$enddefinitions whatever here $end").unwrap();
        assert!(vcd.header().items().is_empty());
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let vcd = parse("").unwrap();
        assert!(vcd.header().items().is_empty());
        assert!(vcd.steps().is_empty());
        assert_eq!(vcd.timescale(), None);
    }

    #[test]
    fn streaming_yields_steps_lazily() {
        let (header, mut steps) = parse_vcd_streaming(
            "$var wire 1 ! clk $end $enddefinitions $end #0 1! #1 0! #2 Q!".as_bytes(),
        )
        .unwrap();
        assert_eq!(header.signals().len(), 1);

        let first = steps.next().unwrap().unwrap();
        assert_eq!(first.time, BigUint::from(0u8));
        // dropping after the first step never touches the bad input
        drop(steps);
    }

    #[test]
    fn header_errors_surface_before_any_step() {
        let result = parse_vcd_streaming("$timescale 10 ns $end".as_bytes());
        assert!(matches!(result, Err(ParseError::Grammar(_))));
    }

    #[test]
    fn spec_example() {
        let vcd = parse(
            "$timescale 1 ns $end
             $scope module top $end
             $var wire 1 ! clk $end
             $upscope $end
             $enddefinitions $end
             #0
             1!
             #5
             0!",
        )
        .unwrap();

        assert_eq!(vcd.timescale(), Some(Timescale::Ns));
        let header = vcd.header();
        let top = header.scope(header.root_scopes()[0]);
        assert_eq!(top.name(), "top");
        let clk = header.signal(top.child_signals()[0]);
        assert_eq!(
            (clk.kind(), clk.width(), clk.identifier(), clk.name()),
            ("wire", 1, "!", "clk")
        );

        let steps = vcd.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].time, BigUint::from(0u8));
        assert_eq!(
            steps[0].values,
            vec![Value::Scalar {
                level: LogicLevel::One,
                identifier: "!".to_string()
            }]
        );
        assert_eq!(steps[1].time, BigUint::from(5u8));
        assert_eq!(
            steps[1].values,
            vec![Value::Scalar {
                level: LogicLevel::Zero,
                identifier: "!".to_string()
            }]
        );
    }
}
