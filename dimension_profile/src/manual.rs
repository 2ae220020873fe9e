/*!

This is the long-form manual for `dimension_profile` and `dimprof`.

## Instruments

Two instruments are built in:
* `riasec` the Holland interest inventory: `R` Realistic, `I` Investigative, `A` Artistic,
  `S` Social, `E` Enterprising, `C` Conventional. Answers go from 1 (Not at all) to 5 (Extremely).
* `tci` the Temperament and Character Inventory: `NS` Novelty Seeking, `HA` Harm Avoidance,
  `RD` Reward Dependence, `P` Persistence, `SD` Self-Directedness, `C` Cooperativeness,
  `ST` Self-Transcendence. Answers go from 1 (Strongly Disagree) to 5 (Strongly Agree).

The order above is the declaration order. It breaks ties in the rankings.

## Scoring

The score of a dimension is the sum of the answers of all its questions. There is no
averaging and no weighting. A dimension without any question has a score of 0.

By default all the questions must be answered. The `--fill-missing` flag (or the `rules`
section of the configuration) counts a fixed answer for the unanswered questions instead.

## Dimension labels

The dimension of a question may be written with its code (`NS`), its full name in any
case (`novelty seeking`) and with surrounding spaces. Any other label is tried one last
time by taking its first two characters in uppercase (`harm` becomes `HA`). This last
rule is a guess: it is reported in the logs, and it can be turned off with
`--strict-labels`.

## Input formats

The following inputs are supported, either as CSV (`csv`) or as Excel spreadsheets
(`xlsx`). The first row holds the names of the columns. Column names are matched
without regard to case or surrounding spaces.

### Questions

```text
ID,Question,Dimension
1,Build kitchen cabinets,Realistic
2,Develop a new medicine,I
```

`question text` and `dimension label` are also accepted as column names. If there is no
`ID` column, the questions are numbered from 1 in the order of the rows. Otherwise
the ids are used exactly as written.

### Responses

```text
ID,Score
1,4
2,5
```

### Scores

A table of scores that were already computed, for example by an earlier session. It
skips the scoring entirely.

```text
Dimension,Score
Realistic,12
I,8
```

If the `Dimension` and `Score` columns are not found, the first two columns are used.

### Meanings

Replaces the description of some dimensions in the reports.

```text
Dimension,Meaning
R,Practical and hands-on
```

## Configuration

Several instruments can be reported together with a JSON configuration file:

```json
{
  "outputSettings": { "reportName": "Combined RIASEC and TCI", "topK": 3 },
  "instrumentSources": [
    { "instrument": "riasec", "provider": "csv",
      "questionsFile": "riasec_questions.csv", "responsesFile": "riasec_responses.csv" },
    { "instrument": "tci", "provider": "csv", "scoresFile": "tci_scores.csv" }
  ],
  "rules": { "missingResponse": "reject", "labelFallback": "derivePrefix" }
}
```

The paths are relative to the configuration file. `missingResponse` is one of `reject`,
`fillMidpoint` and `fillWith` (which uses `fillValue`). `labelFallback` is
`derivePrefix` or `reject`. For Excel inputs, `excelWorksheetName` selects the
worksheet; it may be omitted if the workbook has a single worksheet. `outputDirectory`, if
present, receives `scores.csv` and `summary.json`; it is created if it does not exist.

## Interactive mode

With `--interactive`, the questions that have no answer in the responses file are asked on
the terminal, one at a time, with the labels of the scale. Answers that are not on the scale
are asked again. The profile is computed at the end; an unfinished session stops with the
first unanswered question unless `--fill-missing` is given.

## Outputs

* the text report, printed on the standard output
* `--out`: the ranked scores as CSV (`Dimension,Name,Score,Source`)
* `--summary`: a JSON summary
* `--out ""` or `--summary ""` turn the corresponding output off, even with an `outputDirectory`
* `--top 0` describes no dimension and only prints the breakdown
* `--reference`: a JSON summary to compare against. Differences are printed and make the
  program fail.

 */
